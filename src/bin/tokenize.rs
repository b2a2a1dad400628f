//! strata-wordpiece: Tokenize text with a WordPiece vocabulary.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;

use strata_wordpiece::cli;
use strata_wordpiece::tokenizer::{
    BertTokenizer, EncodedSequence, PaddingSide, PaddingStrategy, TruncationStrategy,
};

#[derive(Parser)]
#[command(name = "strata-wordpiece", about = "Tokenize text with a WordPiece vocabulary")]
struct Args {
    /// Path to a vocab.txt file (one token per line)
    #[arg(short = 'v', long)]
    vocab: PathBuf,

    /// Optional JSON tokenizer config
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Text to tokenize
    #[arg(short = 'p', long, conflicts_with_all = ["file", "stdin"])]
    prompt: Option<String>,

    /// Read text from file
    #[arg(short = 'f', long, conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// Read text from stdin
    #[arg(long)]
    stdin: bool,

    /// Second sequence of a pair
    #[arg(long)]
    pair: Option<String>,

    /// Maximum sequence length including special tokens (0 disables the limit)
    #[arg(long)]
    max_length: Option<usize>,

    /// Truncation strategy: longest_first, only_first, only_second, do_not_truncate
    #[arg(long)]
    truncation: Option<TruncationStrategy>,

    /// Padding strategy: do_not_pad, max_length, longest
    #[arg(long)]
    padding: Option<PaddingStrategy>,

    /// Padding side: right or left
    #[arg(long)]
    padding_side: Option<PaddingSide>,

    /// Overflow context kept by only_first / only_second truncation
    #[arg(long)]
    stride: Option<usize>,

    /// Keep case and accents (cased vocabularies)
    #[arg(long)]
    no_lowercase: bool,

    /// Output only token IDs in list format: [1, 2, 3]
    #[arg(long)]
    ids: bool,

    /// Print total token count
    #[arg(long)]
    show_count: bool,

    /// Output format: text or json
    #[arg(long, default_value = "text", value_parser = validate_output_format)]
    output_format: String,

    /// Suppress all logging
    #[arg(long)]
    log_disable: bool,
}

fn validate_output_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("Unknown output format '{}'. Options: text, json", s)),
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    tokens: Vec<String>,
    #[serde(flatten)]
    encoding: &'a EncodedSequence,
    count: usize,
}

fn main() {
    let args = Args::parse();
    cli::init_logging(args.log_disable);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let input = cli::read_input(args.prompt.as_deref(), args.file.as_deref(), args.stdin)?;

    let mut config = cli::load_config(args.config.as_deref())?;
    if args.no_lowercase {
        config.lowercase = false;
        config.strip_accents = Some(false);
    }
    if let Some(max_length) = args.max_length {
        config.encode.max_length = (max_length > 0).then_some(max_length);
    }
    if let Some(truncation) = args.truncation {
        config.encode.truncation = truncation;
    }
    if let Some(padding) = args.padding {
        config.encode.padding = padding;
    }
    if let Some(side) = args.padding_side {
        config.encode.padding_side = side;
    }
    if let Some(stride) = args.stride {
        config.encode.stride = stride;
    }

    let tokenizer = BertTokenizer::from_vocab_file(&args.vocab, config)?;
    let encoded = tokenizer.encode(&input, args.pair.as_deref())?;
    let tokens = tokenizer.convert_ids_to_tokens(&encoded.input_ids);

    match args.output_format.as_str() {
        "json" => {
            let output = JsonOutput {
                count: encoded.num_real_tokens(),
                tokens,
                encoding: &encoded,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            if args.ids {
                let id_strs: Vec<String> =
                    encoded.input_ids.iter().map(|id| id.to_string()).collect();
                println!("[{}]", id_strs.join(", "));
            } else {
                for (i, (&id, token)) in encoded.input_ids.iter().zip(&tokens).enumerate() {
                    println!("{:>5} -> '{}' (type {})", id, token, encoded.token_type_ids[i]);
                }
            }

            if encoded.num_truncated_tokens > 0 {
                println!("Truncated tokens: {}", encoded.num_truncated_tokens);
            }
            if args.show_count {
                println!("Total number of tokens: {}", encoded.num_real_tokens());
            }
        }
    }

    Ok(())
}
