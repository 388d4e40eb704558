use std::io::{IsTerminal, Write};

use atemxfer_transfer::{lookup, CatalogEntry, TransferMessage};
use atemxfer_wire::FieldKind;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
pub struct FieldOutput {
    name: &'static str,
    offset: usize,
    len: usize,
    kind: &'static str,
    value: String,
}

#[derive(Serialize)]
pub struct MessageOutput {
    title: String,
    name: &'static str,
    direction: &'static str,
    size: usize,
    transfer_id: Option<u16>,
    summary: String,
    fields: Vec<FieldOutput>,
    #[serde(skip)]
    payload: Vec<u8>,
}

impl MessageOutput {
    /// Render a message, describing fields from its canonical encoding.
    pub fn new(message: &TransferMessage) -> Self {
        let payload = message.encode().to_vec();
        let entry = lookup(message.title());
        let fields = message
            .layout()
            .describe(&payload)
            .into_iter()
            .map(|field| FieldOutput {
                name: field.spec.name,
                offset: field.spec.offset,
                len: match field.spec.kind {
                    FieldKind::Tail => payload.len().saturating_sub(field.spec.offset),
                    _ => field.spec.len,
                },
                kind: field.spec.kind.as_str(),
                value: field.value,
            })
            .collect();
        Self {
            title: message.title().to_string(),
            name: entry.map(|e| e.name).unwrap_or("unknown"),
            direction: entry.map(|e| e.direction.as_str()).unwrap_or("unknown"),
            size: payload.len(),
            transfer_id: message.transfer_id(),
            summary: message.to_string(),
            fields,
            payload,
        }
    }
}

pub fn print_messages(messages: &[MessageOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for message in messages {
                println!(
                    "{}",
                    serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            for message in messages {
                println!("{} {}: {}", message.title, message.name, message.summary);
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["FIELD", "RANGE", "KIND", "VALUE"]);
                for field in &message.fields {
                    table.add_row(vec![
                        field.name.to_string(),
                        format!("{}..{}", field.offset, field.offset + field.len),
                        field.kind.to_string(),
                        field.value.clone(),
                    ]);
                }
                println!("{table}");
            }
        }
        OutputFormat::Pretty => {
            for message in messages {
                println!(
                    "{} ({}, {}, {} bytes): {}",
                    message.title, message.name, message.direction, message.size, message.summary
                );
                for field in &message.fields {
                    println!(
                        "  {:<12} [{}..{}] {}",
                        field.name,
                        field.offset,
                        field.offset + field.len,
                        field.value
                    );
                }
            }
        }
        OutputFormat::Raw => {
            for message in messages {
                print_raw(&message.payload);
            }
        }
    }
}

#[derive(Serialize)]
struct CatalogOutput {
    title: String,
    name: &'static str,
    direction: &'static str,
    size: usize,
    variable: bool,
    fields: Vec<CatalogField>,
}

#[derive(Serialize)]
struct CatalogField {
    name: &'static str,
    offset: usize,
    len: usize,
    kind: &'static str,
}

pub fn print_catalog(entries: &[CatalogEntry], format: OutputFormat) {
    let rows: Vec<CatalogOutput> = entries
        .iter()
        .map(|entry| CatalogOutput {
            title: entry.title.to_string(),
            name: entry.name,
            direction: entry.direction.as_str(),
            size: entry.layout.min_size,
            variable: entry.layout.variable,
            fields: entry
                .layout
                .fields
                .iter()
                .map(|f| CatalogField {
                    name: f.name,
                    offset: f.offset,
                    len: f.len,
                    kind: f.kind.as_str(),
                })
                .collect(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TITLE", "NAME", "DIRECTION", "SIZE", "FIELDS"]);
            for row in &rows {
                table.add_row(vec![
                    row.title.clone(),
                    row.name.to_string(),
                    row.direction.to_string(),
                    size_label(row),
                    field_list(row),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &rows {
                println!(
                    "{} {:<20} {:<8} {:>4}  {}",
                    row.title,
                    row.name,
                    row.direction,
                    size_label(row),
                    field_list(row)
                );
            }
        }
    }
}

fn size_label(row: &CatalogOutput) -> String {
    if row.variable {
        format!("{}+", row.size)
    } else {
        row.size.to_string()
    }
}

fn field_list(row: &CatalogOutput) -> String {
    row.fields
        .iter()
        .map(|f| {
            if f.len == 0 {
                format!("{}@{}..", f.name, f.offset)
            } else {
                format!("{}@{}..{}", f.name, f.offset, f.offset + f.len)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
