use abif_reader::{tags, ParseOptions, Record, RecordStore};
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-ab1-file> [--tag <TAG>[,<INSTANCE>]] [--no-strict]", args[0]);
        std::process::exit(1);
    }

    let ab1_path = &args[1];
    let mut options = ParseOptions::default();
    if args.iter().any(|arg| arg == "--no-strict") {
        options = options.with_strict_directory_instance(false);
    }

    // Parse --tag argument
    let mut query: Option<(String, i32)> = None;
    if let Some(tag_idx) = args.iter().position(|arg| arg == "--tag") {
        let Some(tag_str) = args.get(tag_idx + 1) else {
            eprintln!("ERROR: --tag flag requires an argument.");
            std::process::exit(1);
        };
        let (tag, instance) = match tag_str.split_once(',') {
            Some((tag, instance)) => match instance.parse::<i32>() {
                Ok(instance) => (tag, instance),
                Err(_) => {
                    eprintln!("ERROR: Invalid instance '{}'. Expected an integer.", instance);
                    std::process::exit(1);
                }
            },
            None => (tag_str.as_str(), 1),
        };
        if tag.len() != 4 {
            eprintln!("ERROR: Tags are exactly 4 characters, got '{}'.", tag);
            std::process::exit(1);
        }
        query = Some((tag.to_string(), instance));
    }

    println!("Reading ABIF file: {}", ab1_path);
    println!("{}", "=".repeat(60));

    let store = match RecordStore::open_with_options(ab1_path, options) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("\nERROR: Failed to read ABIF file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    if let Some((tag, instance)) = query {
        print_query(&store, &tag, instance);
        return;
    }

    let directory = store.directory();
    println!("\nContainer Information:");
    println!("  Header offset: {}", store.header_offset());
    println!("  Version: {}", directory.version);
    println!("  Directory entries: {}", directory.entry_count);
    println!("  Records kept: {}", store.len());

    let sample = store.get_pascal_string(tags::SMPL, 1);
    if !sample.is_empty() {
        println!("  Sample: {}", sample);
    }
    let machine = store.get_pascal_string(tags::MCHN, 1);
    if !machine.is_empty() {
        println!("  Instrument: {}", machine);
    }
    for instance in [1, 2] {
        if let Ok(bases) = store.try_sequence_bases(instance) {
            println!("  PBAS #{}: {} bases", instance, bases.len());
        }
    }

    println!("\nDirectory:");
    println!("  {:<6} {:>6} {:>6} {:>6} {:>8} {:>10}  value", "tag", "inst", "type", "size", "count", "bytes");
    for record in &store {
        println!("  {}", format_record(record));
    }
}

fn format_record(record: &Record) -> String {
    let value = if record.is_inline() {
        format!("inline {:02x?}", record.inline_bytes())
    } else {
        format!("@{}", record.raw_value)
    };
    format!(
        "{:<6} {:>6} {:>6} {:>6} {:>8} {:>10}  {}",
        record.tag,
        record.instance,
        record.data_type,
        record.data_size,
        record.record_count,
        record.byte_count,
        value
    )
}

fn print_query(store: &RecordStore, tag: &str, instance: i32) {
    let Some(record) = store.record(tag, instance) else {
        eprintln!("ERROR: No record {} #{} in this file.", tag, instance);
        std::process::exit(1);
    };

    println!("\n{}", format_record(record));
    println!("  Value: {}", store.get_value(tag, instance));
    println!("  Pascal string: {:?}", store.get_pascal_string(tag, instance));
    if !record.is_inline() {
        println!("  Payload string: {:?}", store.get_bytes_as_string(tag, instance));
    }

    let bytes = record.data();
    let shown = bytes.len().min(64);
    print!("  Bytes:");
    for b in &bytes[..shown] {
        print!(" {:02x}", b);
    }
    if bytes.len() > shown {
        print!(" ... ({} more)", bytes.len() - shown);
    }
    println!();
}
