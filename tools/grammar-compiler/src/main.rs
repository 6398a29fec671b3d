use clap::Parser;
use std::fs;
use std::path::PathBuf;
use glossa_morph::MorphEngine;
use glossa_protocol::{Headword, HeadwordId, Language, PartOfSpeechId};
use rkyv::ser::{serializers::AllocSerializer, Serializer};

#[derive(Parser)]
#[command(author, version, about = "Compiles a JSON language definition to an rkyv binary")]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Also inflect this sample word across its whole grid and print the results
    #[arg(long, value_name = "WORD")]
    inflect: Option<String>,

    /// Part of speech id for --inflect
    #[arg(long, value_name = "ID")]
    pos: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    println!("📖 Reading JSON from {:?}...", cli.input);
    let input_data = fs::read_to_string(&cli.input)?;

    let language: Language = serde_json::from_str(&input_data)?;

    println!(
        "⚙️  Compiling language version {} with {} parts of speech and {} rules...",
        language.version,
        language.parts_of_speech.len(),
        language.rules.len()
    );

    // Loading through the engine validates every rule pattern up front.
    let engine = MorphEngine::from_language(language.clone())
        .map_err(|err| anyhow::anyhow!("rule validation failed: {err}"))?;

    if let Some(word) = &cli.inflect {
        let pos = PartOfSpeechId(
            cli.pos
                .ok_or_else(|| anyhow::anyhow!("--inflect requires --pos"))?,
        );
        print_grid(&engine, pos, word)?;
    }

    let mut serializer = AllocSerializer::<256>::default();
    serializer.serialize_value(&language).expect("Failed to rkyv serialize");
    let bytes = serializer.into_serializer().into_inner();

    fs::write(&cli.output, bytes)?;

    println!("✅ Success! Binary written to {:?}", cli.output);
    Ok(())
}

fn print_grid(engine: &MorphEngine, pos: PartOfSpeechId, text: &str) -> anyhow::Result<()> {
    let word = Headword {
        id: HeadwordId(0),
        text: text.to_string(),
        part_of_speech: pos,
        classes: Vec::new(),
    };

    for form in engine.all_combined_forms(pos)? {
        let label = engine.form_label(pos, &form)?;
        match engine.generate(&word, &form) {
            Ok(derived) => println!("    {label}: {derived}"),
            Err(glossa_morph::MorphError::FormSuppressed { .. }) => {
                println!("    {label}: (suppressed)")
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
