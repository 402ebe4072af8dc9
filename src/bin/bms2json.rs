//! BMS to JSON event-trace converter

use bms2mid::bms::BmsJson;
use bms2mid::{InstrumentMap, Interpreter};
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bms2json")]
#[command(version = "0.1.0")]
#[command(about = "Dump decoded BMS events as JSON", long_about = None)]
struct Args {
    /// Input .bms file
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Instrument list file (affects program mapping in the trace)
    #[arg(short, long)]
    instruments: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let instruments = match &args.instruments {
        Some(path) => InstrumentMap::from_path(path)?,
        None => InstrumentMap::new(),
    };

    let data = std::fs::read(&args.input)?;
    let song = Interpreter::new(&data, &instruments).with_trace().run()?;
    let bms_json = BmsJson::new(song);

    let json_string = if args.compact {
        serde_json::to_string(&bms_json)?
    } else {
        serde_json::to_string_pretty(&bms_json)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
