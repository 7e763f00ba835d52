use std::str::FromStr;

use anyhow::Context;

/// A `key=value` event condition given on the command line.
#[derive(PartialEq, Eq, Debug, Clone)]
pub(super) struct ParsedEvent {
    pub(super) key: String,
    pub(super) value: String,
}

impl FromStr for ParsedEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        (|| {
            let (key, value) = s.split_once('=').context("Missing = separator")?;
            anyhow::ensure!(!key.is_empty(), "Must not have an empty key");
            anyhow::ensure!(
                !key.contains(char::is_whitespace),
                "Key must not contain whitespace"
            );
            anyhow::ensure!(!value.is_empty(), "Must not have an empty value");
            anyhow::ensure!(!value.contains('\''), "Value must not contain quotes");
            Ok(ParsedEvent {
                key: key.to_owned(),
                value: value.to_owned(),
            })
        })()
        .with_context(|| format!("Could not parse event condition {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::Arbitrary;

    use super::*;

    fn parse_event(s: &str) -> anyhow::Result<ParsedEvent> {
        s.parse()
    }

    fn make_event(key: &str, value: &str) -> ParsedEvent {
        ParsedEvent {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }

    #[test]
    fn sanity() {
        assert_eq!(
            parse_event("message.sender=xpla1abc").unwrap(),
            make_event("message.sender", "xpla1abc")
        );
        assert_eq!(parse_event("tx.height=5").unwrap(), make_event("tx.height", "5"));
        // only the first = separates key and value
        assert_eq!(parse_event("wasm.msg=a=b").unwrap(), make_event("wasm.msg", "a=b"));
        parse_event("foobar").unwrap_err();
        parse_event("=value").unwrap_err();
        parse_event("key=").unwrap_err();
        parse_event("message sender=x").unwrap_err();
        parse_event("key='quoted'").unwrap_err();
    }

    #[derive(Clone, Debug)]
    struct Word(String);

    impl Arbitrary for Word {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            // See https://github.com/BurntSushi/quickcheck/issues/279
            let sizes = (2..20).collect::<Vec<_>>();
            let letters = ('a'..='z').chain(['.', '_']).collect::<Vec<_>>();
            Word(
                (1..*g.choose(&sizes).unwrap())
                    .map(|_| *g.choose(&letters).unwrap())
                    .collect(),
            )
        }
    }

    quickcheck::quickcheck! {
        fn roundtrip(key: Word, value: Word) -> bool {
            let expected = make_event(&key.0, &value.0);
            let actual = parse_event(&format!("{}={}", key.0, value.0)).unwrap();
            assert_eq!(expected, actual);
            true
        }
    }
}
