//! # Layout Report
//!
//! Prints every record's size, alignment and field table so shader authors
//! can check their struct declarations against the packer.
//!
//! Usage: `layout_report [schema.toml] [--all]`

use std::process::ExitCode;

use shaderbuf_layout::{describe_all, LayoutSchema, SchemaRevision, WordView};

fn print_schema(schema: &LayoutSchema) {
    println!("┌─ SCHEMA ───────────────────────────────────────────────────────┐");
    println!("│ Revision:   {}", schema.revision);
    println!("│ Word view:  {:?}", schema.word_view);
    println!("└────────────────────────────────────────────────────────────────┘");
    println!();

    for layout in describe_all(schema) {
        print!("{layout}");
        if !layout.is_dense() {
            println!("  !! fields do not tile the record");
        }
        println!();
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: layout_report [schema.toml] [--all]");
        println!();
        println!("Options:");
        println!("  --all    Print every revision / word view combination");
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--all") {
        for revision in SchemaRevision::ALL {
            for word_view in [WordView::ByteFields, WordView::RawBits] {
                print_schema(&LayoutSchema::new(revision, word_view));
            }
        }
        return ExitCode::SUCCESS;
    }

    let schema = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => match LayoutSchema::from_toml_file(path) {
            Ok(schema) => schema,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => LayoutSchema::default(),
    };

    print_schema(&schema);
    ExitCode::SUCCESS
}
