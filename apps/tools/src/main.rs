use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intake::{compose_email, validate, Envelope};
use shared::{catalog, domain::RegistrationSubmission};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the experience levels and committees the form offers.
    Catalog,
    /// Render the organizer notification for a sample registration.
    PreviewEmail {
        #[arg(long, default_value = "Aigerim K.")]
        full_name: String,
        #[arg(long, default_value = "a@k.kz")]
        email: String,
        #[arg(long, default_value = "+77001234567")]
        phone: String,
        #[arg(long, default_value = "Nazarbayev University")]
        school: String,
        #[arg(long, default_value = "Almaty")]
        city: String,
        #[arg(long, default_value = "1-2")]
        experience: String,
        #[arg(long, default_value = "unep")]
        committee: String,
        #[arg(long, default_value = intake::DEFAULT_ORGANIZER)]
        organizer: String,
        /// Write the HTML here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Catalog => {
            println!("experience:");
            for entry in catalog::EXPERIENCE_LEVELS {
                println!("  {:<6} {}", entry.code, entry.label);
            }
            println!("committees:");
            for entry in catalog::COMMITTEES {
                println!("  {:<6} {}", entry.code, entry.label);
            }
        }
        Command::PreviewEmail {
            full_name,
            email,
            phone,
            school,
            city,
            experience,
            committee,
            organizer,
            out,
        } => {
            let submission = RegistrationSubmission {
                full_name,
                email,
                phone,
                school,
                city,
                experience,
                committee,
            };
            validate(&submission)?;
            let envelope = Envelope {
                organizer,
                ..Envelope::default()
            };
            let message = compose_email(&envelope, &submission);
            println!("from:    {}", message.from);
            println!("to:      {}", message.to.join(", "));
            println!("subject: {}", message.subject);
            match out {
                Some(path) => {
                    fs::write(&path, &message.html)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    println!("html written to {}", path.display());
                }
                None => println!("\n{}", message.html),
            }
        }
    }

    Ok(())
}
