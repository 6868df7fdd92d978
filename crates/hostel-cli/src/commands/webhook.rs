//! Sheet webhook commands
//!
//! `send` builds a form row, signs the exact bytes it posts and submits it to
//! the daemon, which is how the sheet script talks to it. `sign` prints the
//! signature for a body prepared elsewhere.

use crate::client::HostelClient;
use crate::error::{CliError, CliResult};
use crate::output::{self, print_success, OutputFormat};
use clap::{Args, Subcommand};
use hmac::{Hmac, Mac};
use hostel_types::{SheetAction, SheetRowPayload};
use sha2::Sha256;
use std::io::Read;
use std::path::PathBuf;

type HmacSha256 = Hmac<Sha256>;

/// Webhook subcommands
#[derive(Subcommand)]
pub enum WebhookCommands {
    /// Submit a form row to the daemon
    Send(SendArgs),

    /// Print the signature for a request body
    Sign {
        /// Body file; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Shared secret (defaults to the configured one)
        #[arg(long, env = "HOSTEL_WEBHOOK_SECRET")]
        secret: Option<String>,
    },
}

/// Form row fields
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Facility short code, e.g. `G`
    #[arg(long)]
    pub hostel_code: String,

    #[arg(long)]
    pub floor: u32,

    /// Room as written on the form
    #[arg(long)]
    pub room: String,

    #[arg(long)]
    pub student_id: String,

    #[arg(long)]
    pub name: String,

    /// checkin or checkout
    #[arg(long, value_parser = parse_action)]
    pub action: SheetAction,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Shared secret (defaults to the configured one)
    #[arg(long, env = "HOSTEL_WEBHOOK_SECRET")]
    pub secret: Option<String>,

    /// Send without a signature header
    #[arg(long)]
    pub unsigned: bool,
}

impl SendArgs {
    fn payload(&self) -> SheetRowPayload {
        SheetRowPayload {
            timestamp: chrono::Utc::now().to_rfc3339(),
            student_id: self.student_id.trim().into(),
            student_name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            hostel_code: self.hostel_code.clone(),
            floor_number: self.floor,
            room_label: self.room.clone(),
            action: self.action,
        }
    }
}

fn parse_action(value: &str) -> Result<SheetAction, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("expected `checkin` or `checkout`, got `{}`", value))
}

/// Hex HMAC-SHA256 of `body`
pub fn sign(secret: &str, body: &[u8]) -> CliResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Execute a webhook command
pub async fn execute(
    command: WebhookCommands,
    configured_secret: Option<String>,
    client: &HostelClient,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        WebhookCommands::Send(args) => {
            let payload = args.payload();
            payload
                .validate()
                .map_err(|e| CliError::InvalidInput(e.to_string()))?;
            let body = serde_json::to_vec(&payload)?;

            let signature = if args.unsigned {
                None
            } else {
                let secret = args.secret.clone().or(configured_secret).ok_or_else(|| {
                    CliError::Config(
                        "no webhook secret; pass --secret, set webhook_secret or use --unsigned".into(),
                    )
                })?;
                Some(sign(&secret, &body)?)
            };

            tracing::debug!(action = %payload.action, signed = signature.is_some(), "Sending webhook");
            let ack = client.send_webhook(body, signature.as_deref()).await?;
            match format {
                OutputFormat::Table => {
                    print_success(&format!(
                        "{} accepted for {} floor {} room {}",
                        ack.action, ack.facility, ack.floor, ack.room_id
                    ));
                    Ok(())
                }
                _ => output::print_single(&ack, format),
            }
        }

        WebhookCommands::Sign { file, secret } => {
            let secret = secret
                .or(configured_secret)
                .ok_or_else(|| CliError::Config("no webhook secret; pass --secret".into()))?;
            let body = read_body(file.as_deref())?;
            println!("{}", sign(&secret, &body)?);
            Ok(())
        }
    }
}

fn read_body(file: Option<&std::path::Path>) -> CliResult<Vec<u8>> {
    match file {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read(path)?),
        _ => {
            let mut body = Vec::new();
            std::io::stdin().read_to_end(&mut body)?;
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sign_known_vector() {
        // RFC 4231 test case 2
        assert_eq!(
            sign("Jefe", b"what do ya want for nothing?").unwrap(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_parse_action_is_strict() {
        assert_eq!(parse_action("checkin").unwrap(), SheetAction::Checkin);
        assert_eq!(parse_action("checkout").unwrap(), SheetAction::Checkout);
        assert!(parse_action("Check In").is_err());
    }

    #[test]
    fn test_payload_from_args_validates() {
        let args = SendArgs {
            hostel_code: "G".to_string(),
            floor: 2,
            room: "318".to_string(),
            student_id: "S9".to_string(),
            name: "Meera".to_string(),
            action: SheetAction::Checkin,
            email: None,
            phone: None,
            secret: None,
            unsigned: true,
        };
        let payload = args.payload();
        assert!(payload.validate().is_ok());
        assert!(payload.submitted_at().is_some());
        assert_eq!(payload.floor_number, 2);
    }

    #[test]
    fn test_read_body_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"a\":1}").unwrap();
        assert_eq!(read_body(Some(file.path())).unwrap(), b"{\"a\":1}");
    }
}
