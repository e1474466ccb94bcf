use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// File containing one NMEA sentence per line.
    file: PathBuf,
    /// Print sentences that fail to parse to stderr and keep going.
    #[arg(long)]
    keep_going: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let file = File::open(&args.file)
        .map_err(|e| anyhow::anyhow!("cannot open {}: {e}", args.file.display()))?;
    let reader = BufReader::new(file);

    let mut parser = aivdm::Parser::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        match parser.parse(line) {
            Ok(Some(message)) => {
                println!("{message}");
                if let aivdm::AisMessage::BinaryBroadcast(envelope) = &message
                    && let Ok(Some(payload)) = envelope.application_payload()
                {
                    print_payload(&payload);
                }
                if let aivdm::AisMessage::BinaryAddressed(envelope) = &message
                    && let Ok(Some(payload)) = envelope.application_payload()
                {
                    print_payload(&payload);
                }
                println!();
            }
            Ok(None) => {} // waiting for the rest of the fragment group
            Err(e) => {
                eprintln!("{line}: {e}");
                if !args.keep_going {
                    anyhow::bail!("parse failed: {e}");
                }
            }
        }
    }
    Ok(())
}

fn print_payload(payload: &aivdm::ApplicationPayload) {
    match payload {
        aivdm::ApplicationPayload::AreaNotice(notice) => println!("{notice}"),
        aivdm::ApplicationPayload::MeteoHydro(report) => println!("{report}"),
    }
}
