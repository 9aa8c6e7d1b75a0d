//! Output formatting shared by commands

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;
use crate::core::quantity::Quantity;

/// Format a number for display: at most six decimals, trailing zeros
/// removed
pub fn format_number(value: f64) -> String {
    let s = format!("{:.6}", value);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Quantity as "value unit"
pub fn format_quantity(quantity: &Quantity) -> String {
    format!("{} {}", format_number(quantity.value()), quantity.unit())
}

/// Print a value as YAML or JSON; returns false for other formats
pub fn print_serialized<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Auto | OutputFormat::Tsv => Ok(false),
    }
}

/// A labelled row of a report
pub enum Field {
    Quantity(&'static str, Quantity),
    Count(&'static str, usize),
    Number(&'static str, f64),
    Text(&'static str, String),
}

impl Field {
    fn key(&self) -> &'static str {
        match self {
            Field::Quantity(k, _) | Field::Count(k, _) | Field::Number(k, _) | Field::Text(k, _) => k,
        }
    }

    fn value(&self) -> String {
        match self {
            Field::Quantity(_, q) => format_number(q.value()),
            Field::Count(_, n) => n.to_string(),
            Field::Number(_, v) => format_number(*v),
            Field::Text(_, t) => t.clone(),
        }
    }

    fn unit(&self) -> String {
        match self {
            Field::Quantity(_, q) => q.unit().to_string(),
            _ => String::new(),
        }
    }
}

/// Print report fields as `key<TAB>value<TAB>unit` lines
pub fn print_tsv(fields: &[Field]) {
    for field in fields {
        println!("{}\t{}\t{}", field.key(), field.value(), field.unit());
    }
}

/// Print report fields as an aligned, labelled section
pub fn print_report(title: &str, fields: &[Field]) {
    println!("{}", style(title).bold());
    println!("{}", style("─".repeat(40)).dim());
    for field in fields {
        let value = match field {
            Field::Quantity(_, q) => format!("{} {}", style(format_number(q.value())).cyan(), q.unit()),
            _ => style(field.value()).cyan().to_string(),
        };
        println!("  {:<18} {}", field.key().replace('_', " "), value);
    }
}

/// Print rows as a table (auto) or as TSV lines
pub fn print_rows(header: &[&str], rows: Vec<Vec<String>>, format: OutputFormat) {
    if format == OutputFormat::Tsv {
        for row in rows {
            println!("{}", row.join("\t"));
        }
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row);
    }
    println!("{}", builder.build().with(Style::rounded()));
}
