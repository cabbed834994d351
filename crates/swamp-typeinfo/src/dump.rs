//! Human-readable listing of a chunk, one entry per line.

use std::fmt::Write;

use swamp_core::Colors;

use crate::chunk::{InfoIndex, InfoType, TypeInfoChunk};

pub fn dump(chunk: &TypeInfoChunk, colors: Colors) -> String {
    let mut out = String::new();
    for (index, entry) in chunk.iter() {
        let c = &colors;
        let _ = write!(
            out,
            "{}{index}{} {}{}{}",
            c.index,
            c.reset,
            c.keyword,
            entry.kind().keyword(),
            c.reset
        );
        write_payload(&mut out, entry, c);
        out.push('\n');
    }
    out
}

fn write_payload(out: &mut String, entry: &InfoType, c: &Colors) {
    match entry {
        InfoType::List(inner) | InfoType::Array(inner) => {
            let _ = write!(out, " {inner}");
        }
        InfoType::Alias { name, target } => {
            let _ = write!(out, " {}{name}{} = {target}", c.name, c.reset);
        }
        InfoType::Record { fields } => {
            out.push_str(" {");
            for (i, field) in fields.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                let _ = write!(out, "{sep}{}: {}", field.name, field.ty);
            }
            out.push_str(" }");
        }
        InfoType::Tuple { elements } => write_list(out, elements),
        InfoType::Function { parameters } => write_list(out, parameters),
        InfoType::Custom { name, variants } => {
            let _ = write!(out, " {}{name}{} {{", c.name, c.reset);
            for (i, variant) in variants.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                let _ = write!(out, "{sep}{}", variant.name);
                if !variant.parameters.is_empty() {
                    write_list(out, &variant.parameters);
                }
            }
            out.push_str(" }");
        }
        InfoType::LocalType { name } => {
            let _ = write!(out, " {name}");
        }
        _ => {}
    }
}

fn write_list(out: &mut String, items: &[InfoIndex]) {
    out.push_str(" (");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{item}");
    }
    out.push(')');
}
