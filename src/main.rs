use bms2mid::midi::MidiWriter;
use bms2mid::{InstrumentMap, Interpreter};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bms2mid")]
#[command(version = "0.1.0")]
#[command(about = "BMS to Standard MIDI File converter", long_about = None)]
struct Args {
    /// Input .bms file
    input: PathBuf,

    /// Output .mid file
    output: PathBuf,

    /// Text file listing an instrument name or General MIDI number per
    /// instrument ID; without it the instruments will probably be wrong
    #[arg(short, long)]
    instruments: Option<PathBuf>,
}

fn main() -> Result<(), bms2mid::Error> {
    let args = Args::parse();

    let instruments = match &args.instruments {
        Some(path) => InstrumentMap::from_path(path)?,
        None => InstrumentMap::new(),
    };

    let data = std::fs::read(&args.input)?;
    let song = Interpreter::new(&data, &instruments).run()?;

    let mut writer = MidiWriter::new(&args.output)?;
    writer.write(&song)?;

    Ok(())
}
