use std::fs;
use std::io::Read;
use std::path::PathBuf;

use structopt::StructOpt;

use courier::{config, Attachment, Mailer, SmtpMailer};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "courier",
    about = "Sends an email through the configured SMTP relay."
)]
struct Opt {
    #[structopt(short, long)]
    sender: String,

    #[structopt(short, long)]
    recipients: Vec<String>,

    #[structopt(long)]
    subject: String,

    /// Path to the config file. Defaults to /etc/courier/courier.toml.
    #[structopt(short, long)]
    config: Option<String>,

    /// Files to attach. Each file's name becomes the attachment name.
    #[structopt(short, long)]
    attach: Vec<PathBuf>,
}

fn main() {
    // Init logger
    env_logger::builder().format_timestamp_micros().init();

    let opt = Opt::from_args();

    let config = config::load_config(opt.config.as_deref());

    // Get message body from stdin
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .expect("Failed to read message body from stdin!");

    let attachments: Vec<Attachment> = opt
        .attach
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| panic!("Not a file: {}", path.display()));
            let payload = fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

            Attachment::new(name, payload)
        })
        .collect();

    let transport = SmtpMailer::new(&config).expect("Failed to set up SMTP transport!");
    let mut mailer = Mailer::new(transport);

    let result = if attachments.is_empty() {
        mailer.send_email(&opt.sender, &opt.subject, &body, &opt.recipients)
    } else {
        mailer.send_email_with_attachments(
            &opt.sender,
            &opt.subject,
            &body,
            &opt.recipients,
            &attachments,
        )
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
