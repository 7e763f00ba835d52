mod parsed_event;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use cosmos_lcd::{
    msgs::Msg, CreateTxOptions, LcdClient, LcdOpt, SignerOptions, Tx, TxInfo, TxOutcome,
    TxSearchOptions,
};
use parsed_event::ParsedEvent;

/// Command line tool for Cosmos LCD transaction workflows
#[derive(clap::Parser)]
struct Cmd {
    #[clap(flatten)]
    opt: Opt,
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[derive(clap::Parser)]
struct Opt {
    #[clap(flatten)]
    network_opt: LcdOpt,
    /// Turn on verbose output
    #[clap(long, short, global = true)]
    verbose: bool,
}

impl Opt {
    fn init_logger(&self) {
        let env = env_logger::Env::default().default_filter_or(if self.verbose {
            format!("{}=debug,cosmos_lcd=debug,info", env!("CARGO_CRATE_NAME"))
        } else {
            "info".to_owned()
        });
        env_logger::Builder::from_env(env).init();
    }

    fn client(&self) -> Result<LcdClient> {
        self.network_opt
            .build()
            .context("Unable to configure LCD client")
    }
}

/// A transaction given on the command line.
#[derive(clap::Parser)]
struct TxInput {
    /// Base64 encoded protobuf transaction
    #[clap(long, conflicts_with = "file")]
    tx: Option<String>,
    /// File containing the transaction, either as base64 or as JSON
    #[clap(long)]
    file: Option<PathBuf>,
}

impl TxInput {
    fn load(&self, client: &LcdClient) -> Result<Tx> {
        match (&self.tx, &self.file) {
            (Some(tx), _) => client.decode(tx).context("Invalid base64 transaction"),
            (None, Some(file)) => {
                let contents = fs_err::read_to_string(file)?;
                let contents = contents.trim();
                if contents.starts_with('{') {
                    let json = serde_json::from_str(contents)
                        .with_context(|| format!("Invalid JSON in {}", file.display()))?;
                    Tx::from_data(json, client.get_config().is_classic())
                        .with_context(|| format!("Invalid transaction in {}", file.display()))
                } else {
                    client
                        .decode(contents)
                        .with_context(|| format!("Invalid base64 in {}", file.display()))
                }
            }
            (None, None) => Err(anyhow::anyhow!("Provide either --tx or --file")),
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Sync mode, then poll until the transaction is in a block
    Wait,
    Sync,
    Async,
    Block,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cmd::parse();
    cmd.opt.init_logger();

    cmd.subcommand.go(cmd.opt).await
}

#[derive(clap::Parser)]
enum Subcommand {
    /// Show config
    ShowConfig {},
    /// Show on-chain account metadata
    Account {
        /// Account address
        address: String,
    },
    /// Show the balances of an account
    Balance {
        /// Account address
        address: String,
    },
    /// Show the total supply of every denomination
    Supply {},
    /// Show bank and staking module parameters
    ChainParams {},
    /// List delegations of a delegator, to a validator, or between the two
    Delegations {
        #[clap(long)]
        delegator: Option<String>,
        #[clap(long)]
        validator: Option<String>,
    },
    /// Show transaction details
    ShowTx {
        txhash: String,
        /// Wait this many seconds for the transaction to be included
        #[clap(long)]
        wait: Option<u64>,
        /// Show the logs and the decoded transaction
        #[clap(long)]
        complete: bool,
        /// Pretty-print JSON output?
        #[clap(long)]
        pretty: bool,
    },
    /// Decode a transaction and print its JSON form and hash
    DecodeTx {
        #[clap(flatten)]
        input: TxInput,
    },
    /// Encode a transaction to base64 protobuf
    EncodeTx {
        #[clap(flatten)]
        input: TxInput,
    },
    /// Search transactions by event attributes
    Search {
        /// Event condition, e.g. message.sender=xpla1...
        #[clap(long = "event")]
        events: Vec<ParsedEvent>,
        /// Raw query for Cosmos SDK 0.47 and later
        #[clap(long)]
        query: Option<String>,
        /// Maximum number of transactions to return
        #[clap(long)]
        limit: Option<u64>,
    },
    /// List the transactions in a block
    TxsByHeight {
        /// Block height, latest if omitted
        height: Option<u64>,
        /// Only print the hashes
        #[clap(long)]
        hashes_only: bool,
        /// Seconds to wait for the block to be indexed
        #[clap(long)]
        timeout: Option<u64>,
    },
    /// Broadcast a signed transaction
    Broadcast {
        #[clap(flatten)]
        input: TxInput,
        #[clap(long, value_enum, default_value = "wait")]
        mode: Mode,
        /// Seconds to wait for inclusion in wait mode
        #[clap(long)]
        timeout: Option<u64>,
    },
    /// Estimate the fee for a list of messages
    EstimateFee {
        /// Address of the signer
        #[clap(long, env = "COSMOS_SENDER")]
        sender: String,
        /// Messages in their JSON form with an @type field
        #[clap(long = "msg", required = true)]
        msgs: Vec<String>,
        /// Memo to put on transaction
        #[clap(long)]
        memo: Option<String>,
        /// Fixed gas limit instead of simulating
        #[clap(long)]
        gas: Option<u64>,
    },
}

impl Subcommand {
    pub(crate) async fn go(self, opt: Opt) -> Result<()> {
        match self {
            Subcommand::ShowConfig {} => {
                let client = opt.client()?;
                println!("{:#?}", client.get_config())
            }
            Subcommand::Account { address } => {
                let account = opt.client()?.account_info(&address).await?;
                println!("Address: {}", account.address);
                println!("Account number: {}", account.account_number);
                println!("Sequence: {}", account.sequence);
                match account.public_key {
                    Some(key) => println!("Public key: {}", key.to_data()),
                    None => println!("Public key: none"),
                }
            }
            Subcommand::Balance { address } => {
                let (balances, _) = opt.client()?.balance(&address, &[]).await?;
                for (denom, amount) in balances.iter() {
                    println!("{amount}{denom}");
                }
            }
            Subcommand::Supply {} => {
                let (supply, _) = opt.client()?.total(&[]).await?;
                for (denom, amount) in supply.iter() {
                    println!("{amount}{denom}");
                }
            }
            Subcommand::ChainParams {} => {
                let client = opt.client()?;
                println!("{:#?}", client.bank_parameters().await?);
                println!("{:#?}", client.staking_parameters().await?);
            }
            Subcommand::Delegations {
                delegator,
                validator,
            } => {
                let (delegations, _) = opt
                    .client()?
                    .delegations(delegator.as_deref(), validator.as_deref(), &[])
                    .await?;
                for delegation in delegations {
                    println!(
                        "{} -> {}: {} shares, {}",
                        delegation.delegator_address,
                        delegation.validator_address,
                        delegation.shares,
                        delegation.balance
                    );
                }
            }
            Subcommand::ShowTx {
                txhash,
                wait,
                complete,
                pretty,
            } => {
                let client = opt.client()?;
                let info = match wait {
                    Some(secs) => {
                        client
                            .wait_for_transaction(&txhash, Duration::from_secs(secs))
                            .await?
                    }
                    None => match client.tx_info(&txhash).await? {
                        cosmos_lcd::TxLookup::Found(info) => *info,
                        cosmos_lcd::TxLookup::Error(e) => {
                            anyhow::bail!("Unable to load {txhash}: code {}, {}", e.code, e.message)
                        }
                    },
                };
                print_tx_info(&client, &info, complete, pretty)?;
            }
            Subcommand::DecodeTx { input } => {
                let client = opt.client()?;
                let tx = input.load(&client)?;
                let json = tx.to_data(client.get_config().is_classic())?;
                serde_json::to_writer_pretty(std::io::stdout(), &json)?;
                println!();
                println!("Hash: {}", client.hash(&tx)?);
            }
            Subcommand::EncodeTx { input } => {
                let client = opt.client()?;
                let tx = input.load(&client)?;
                println!("{}", client.encode(&tx)?);
            }
            Subcommand::Search {
                events,
                query,
                limit,
            } => {
                let client = opt.client()?;
                let mut options = TxSearchOptions::new();
                for ParsedEvent { key, value } in events {
                    options.add_event(key, value);
                }
                options.set_query(query);
                if let Some(limit) = limit {
                    options.add_param("pagination.limit", limit.to_string());
                }
                let res = client.search(&options).await?;
                for info in &res.txs {
                    println!("{} {} {}", info.height, info.txhash, outcome_label(info));
                }
                log::info!("{} of {} total", res.txs.len(), res.pagination.total);
            }
            Subcommand::TxsByHeight {
                height,
                hashes_only,
                timeout,
            } => {
                let client = opt.client()?;
                if hashes_only {
                    for txhash in client.tx_hashes_by_height(height).await? {
                        println!("{txhash}");
                    }
                } else {
                    let infos = match timeout {
                        Some(secs) => {
                            client
                                .tx_infos_by_height_with_timeout(height, Duration::from_secs(secs))
                                .await?
                        }
                        None => client.tx_infos_by_height(height).await?,
                    };
                    for info in &infos {
                        println!("{} {}", info.txhash, outcome_label(info));
                    }
                }
            }
            Subcommand::Broadcast {
                input,
                mode,
                timeout,
            } => {
                let client = opt.client()?;
                let tx = input.load(&client)?;
                anyhow::ensure!(tx.is_signed(), "Refusing to broadcast an unsigned transaction");
                match mode {
                    Mode::Wait => {
                        let res = match timeout {
                            Some(secs) => {
                                client
                                    .broadcast_with_timeout(&tx, Duration::from_secs(secs))
                                    .await?
                            }
                            None => client.broadcast(&tx).await?,
                        };
                        println!("Transaction hash: {}", res.txhash);
                        println!("Height: {}", res.height);
                        println!("Gas used: {}/{}", res.gas_used, res.gas_wanted);
                        println!("Raw log: {}", res.raw_log);
                        if let TxOutcome::Error { code, codespace, .. } = &res.outcome {
                            anyhow::bail!("Transaction failed with code {code} ({codespace:?})");
                        }
                    }
                    Mode::Sync => {
                        let res = client.broadcast_sync(&tx).await?;
                        println!("Transaction hash: {}", res.txhash);
                        println!("Raw log: {}", res.raw_log);
                        anyhow::ensure!(!res.is_error(), "CheckTx failed");
                    }
                    Mode::Async => {
                        let res = client.broadcast_async(&tx).await?;
                        println!("Transaction hash: {}", res.txhash);
                    }
                    Mode::Block => {
                        let res = client.broadcast_block(&tx).await?;
                        println!("Transaction hash: {}", res.txhash);
                        println!("Height: {}", res.height);
                        println!("Raw log: {}", res.raw_log);
                    }
                }
            }
            Subcommand::EstimateFee {
                sender,
                msgs,
                memo,
                gas,
            } => {
                let client = opt.client()?;
                let is_classic = client.get_config().is_classic();
                let mut options = CreateTxOptions::new();
                for msg in msgs {
                    let json = serde_json::from_str(&msg)
                        .with_context(|| format!("Invalid message JSON: {msg}"))?;
                    options.add_message(Msg::from_data(json, is_classic)?);
                }
                options.set_optional_memo(memo).set_gas(gas);
                let tx = client
                    .create(&[SignerOptions::new(sender)], &options)
                    .await?;
                let fee = &tx.auth_info.fee;
                println!("Gas: {}", fee.gas_limit);
                println!("Fee: {}", fee.amount);
            }
        }
        Ok(())
    }
}

fn outcome_label(info: &TxInfo) -> String {
    match &info.code {
        Some(code) if info.is_error() => format!("failed (code {code})"),
        _ => "succeeded".to_owned(),
    }
}

fn print_tx_info(client: &LcdClient, info: &TxInfo, complete: bool, pretty: bool) -> Result<()> {
    println!("Height: {}", info.height);
    println!("Status: {}", outcome_label(info));
    if let Some(codespace) = &info.codespace {
        println!("Codespace: {codespace}");
    }
    if pretty {
        match serde_json::from_str::<serde_json::Value>(&info.raw_log) {
            Err(_) => println!("Raw log is not JSON: {}", info.raw_log),
            Ok(raw_log) => {
                serde_json::to_writer_pretty(std::io::stdout(), &raw_log)?;
                println!();
            }
        }
    } else {
        println!("Raw log: {}", info.raw_log);
    }
    println!("Gas wanted: {}", info.gas_wanted);
    println!("Gas used: {}", info.gas_used);
    match info.block_time() {
        Some(time) => println!("Timestamp: {time}"),
        None => println!("Timestamp: {}", info.timestamp),
    }
    if complete {
        for (idx, log) in info.logs.iter().enumerate() {
            println!("Log #{idx}: {log:?}");
        }
        let json = info.tx.to_data(client.get_config().is_classic())?;
        serde_json::to_writer_pretty(std::io::stdout(), &json)?;
        println!();
    }
    Ok(())
}
