//! Command-line entry point: wires configuration, key, channel and client,
//! then runs one lookup.

use crate::application::client::SwitchCmsClient;
use crate::config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_CA_CERT_PATH, DEFAULT_PUBLIC_KEY_PATH,
};
use crate::domain::card::TraceId;
use crate::domain::request::CardholderDetails;
use crate::error::Result;
use crate::infrastructure::https_channel::HttpsChannel;
use crate::infrastructure::rsa_encryption::RsaEncryptionService;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use zeroize::Zeroizing;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub switch: SwitchArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Switch CMS customer-details endpoint (https only)
    #[arg(
        long,
        global = true,
        env = "SWITCH_CMS_BASE_URL",
        default_value = DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// PEM file with the switch's RSA public key
    #[arg(
        long,
        global = true,
        env = "SWITCH_CMS_PUBLIC_KEY",
        default_value = DEFAULT_PUBLIC_KEY_PATH
    )]
    pub public_key: PathBuf,

    /// PEM bundle of CAs trusted to sign the switch certificate
    #[arg(
        long,
        global = true,
        env = "SWITCH_CMS_CA_CERT",
        default_value = DEFAULT_CA_CERT_PATH
    )]
    pub ca_cert: PathBuf,

    #[arg(
        long,
        global = true,
        env = "SWITCH_CMS_CONNECT_TIMEOUT_SECS",
        default_value_t = 5
    )]
    pub connect_timeout_secs: u64,

    #[arg(
        long,
        global = true,
        env = "SWITCH_CMS_READ_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub read_timeout_secs: u64,
}

impl SwitchArgs {
    pub fn into_config(self) -> Result<ClientConfig> {
        Ok(ClientConfig::new(&self.base_url)?
            .with_public_key_path(self.public_key)
            .with_ca_cert_path(self.ca_cert)
            .with_timeouts(
                Duration::from_secs(self.connect_timeout_secs),
                Duration::from_secs(self.read_timeout_secs),
            ))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the mobile number and email registered for a card
    Lookup(LookupArgs),
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Card number; spaces between digit groups are removed before validation
    pub card_number: String,

    /// Correlation id, 1-15 alphanumeric characters. Generated when omitted.
    #[arg(long)]
    pub trace_id: Option<String>,

    /// Cardholder name, sent encrypted
    #[arg(long)]
    pub name: Option<String>,

    /// Cardholder mobile, sent encrypted
    #[arg(long)]
    pub mobile: Option<String>,

    /// Cardholder email, sent encrypted
    #[arg(long)]
    pub email: Option<String>,
}

pub async fn run(cli: Cli) -> miette::Result<()> {
    let config = cli.switch.into_config().into_diagnostic()?;
    match cli.command {
        Command::Lookup(args) => lookup(&config, args).await,
    }
}

async fn lookup(config: &ClientConfig, args: LookupArgs) -> miette::Result<()> {
    // Key and trust material load before any card data is touched.
    let encryptor = RsaEncryptionService::load(&config.public_key_path).into_diagnostic()?;
    let channel = HttpsChannel::from_config(config).into_diagnostic()?;
    let client = SwitchCmsClient::new(
        Arc::new(channel),
        Arc::new(encryptor),
        config.base_url.as_str(),
    );

    let trace_id = args
        .trace_id
        .unwrap_or_else(|| TraceId::generate().into());
    let typed = Zeroizing::new(args.card_number);
    let details = CardholderDetails {
        card_number: strip_card_spacing(&typed),
        name: args.name,
        mobile: args.mobile,
        email: args.email,
    };

    let response = client
        .send_lookup(&trace_id, &details)
        .await
        .into_diagnostic()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&response).into_diagnostic()?
    );
    Ok(())
}

/// Removes the grouping whitespace people type into card numbers. The library
/// itself treats any whitespace as invalid input.
fn strip_card_spacing(typed: &str) -> String {
    typed.split_whitespace().collect()
}
