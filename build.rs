//! Embed every `lang/*.json` bundle as `EMBEDDED_LANGS: &[(code, raw_json)]`.
use std::{env, fs, path::Path};

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR");
    let lang_dir = Path::new(&manifest_dir).join("lang");
    println!("cargo:rerun-if-changed={}", lang_dir.display());

    let mut entries: Vec<(String, String)> = fs::read_dir(&lang_dir)
        .expect("read lang dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |x| x == "json"))
        .filter_map(|p| {
            let code = p.file_stem()?.to_str()?.to_string();
            Some((code, p.display().to_string()))
        })
        .collect();
    entries.sort();

    let mut out = String::from("pub static EMBEDDED_LANGS: &[(&str, &str)] = &[\n");
    for (code, path) in &entries {
        println!("cargo:rerun-if-changed={path}");
        out.push_str(&format!("    ({code:?}, include_str!({path:?})),\n"));
    }
    out.push_str("];\n");

    let out_path = Path::new(&env::var("OUT_DIR").expect("OUT_DIR")).join("lang_data.rs");
    fs::write(out_path, out).expect("write lang_data.rs");
}
