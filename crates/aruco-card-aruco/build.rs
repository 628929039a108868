//! Compile `data/*_CODES.json` into `$OUT_DIR/builtins.rs`.
//!
//! Marker rows are stored the way OpenCV lists them (first rotation only) and
//! repacked here into the black = 1 codes `Dictionary` expects.

use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::{env, fs};

#[derive(Deserialize)]
struct DictionaryFile {
    name: String,
    marker_size: usize,
    max_correction_bits: u8,
    /// One row per marker in OpenCV's layout: cells row-major, MSB first,
    /// a set bit is white.
    bytes: Vec<Vec<u8>>,
}

/// Repack one OpenCV byte row as a code with bit `y * n + x` set for black.
fn code_from_bytes(row: &[u8], bits: usize) -> u64 {
    (0..bits).fold(0u64, |code, k| {
        let white = (row[k / 8] >> (7 - k % 8)) & 1 == 1;
        if white {
            code
        } else {
            code | (1 << k)
        }
    })
}

fn main() {
    let data_dir = Path::new(&env::var("CARGO_MANIFEST_DIR").expect("manifest dir")).join("data");
    println!("cargo:rerun-if-changed={}", data_dir.display());

    let mut files: Vec<PathBuf> = fs::read_dir(&data_dir)
        .expect("read data dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_CODES.json"))
        })
        .collect();
    files.sort();

    let mut out = String::new();
    out.push_str("use crate::Dictionary;\n\n");

    let mut names = Vec::new();
    for path in &files {
        println!("cargo:rerun-if-changed={}", path.display());
        let raw = fs::read_to_string(path).expect("read dictionary json");
        let dict: DictionaryFile = serde_json::from_str(&raw)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));

        let bits = dict.marker_size * dict.marker_size;
        assert!(bits <= 64, "{}: {bits} bits > 64", dict.name);
        assert!(!dict.bytes.is_empty(), "{}: no markers", dict.name);
        let row_len = bits.div_ceil(8);
        let codes: Vec<u64> = dict
            .bytes
            .iter()
            .enumerate()
            .map(|(id, row)| {
                assert!(
                    row.len() == row_len,
                    "{}: marker {id} has {} bytes, expected {row_len}",
                    dict.name,
                    row.len()
                );
                code_from_bytes(row, bits)
            })
            .collect();

        let ident = dict.name.to_uppercase();
        let codes_ident = format!("{ident}_CODES");
        writeln!(out, "static {codes_ident}: [u64; {}] = [", codes.len()).unwrap();
        for chunk in codes.chunks(8) {
            let row: Vec<String> = chunk.iter().map(|c| format!("0x{c:016x}")).collect();
            writeln!(out, "    {},", row.join(", ")).unwrap();
        }
        out.push_str("];\n\n");

        writeln!(out, "/// Built-in dictionary `{}`.", dict.name).unwrap();
        writeln!(out, "pub const {ident}: Dictionary = Dictionary {{").unwrap();
        writeln!(out, "    name: {:?},", dict.name).unwrap();
        writeln!(out, "    marker_size: {},", dict.marker_size).unwrap();
        writeln!(out, "    max_correction_bits: {},", dict.max_correction_bits).unwrap();
        writeln!(out, "    codes: &{codes_ident},").unwrap();
        out.push_str("};\n\n");

        names.push((dict.name, ident));
    }

    out.push_str("/// Names of every embedded dictionary.\n");
    writeln!(out, "pub const BUILTIN_DICTIONARY_NAMES: &[&str] = &[").unwrap();
    for (name, _) in &names {
        writeln!(out, "    {name:?},").unwrap();
    }
    out.push_str("];\n\n");

    out.push_str("/// Look up an embedded dictionary by name (e.g. `\"DICT_4X4_50\"`).\n");
    out.push_str("pub fn builtin_dictionary(name: &str) -> Option<Dictionary> {\n");
    out.push_str("    match name {\n");
    for (name, ident) in &names {
        writeln!(out, "        {name:?} => Some({ident}),").unwrap();
    }
    out.push_str("        _ => None,\n    }\n}\n");

    let dest = Path::new(&env::var("OUT_DIR").expect("out dir")).join("builtins.rs");
    fs::write(dest, out).expect("write builtins.rs");
}
