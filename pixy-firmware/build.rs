//! Build script for pixy-firmware
//!
//! - Places memory.x on the linker search path
//! - Rejects a malformed pixy.toml before the firmware is built

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted in the [camera] section, with their allowed range
const CAMERA_KEYS: &[(&str, i64, i64)] = &[
    ("address", 0x01, 0x7F),
    ("init_timeout_ms", 0, u32::MAX as i64),
    ("poll_interval_ms", 1, u32::MAX as i64),
    ("signature", 0, 255),
    ("max_blocks", 0, 255),
    ("brightness", 0, 255),
    ("frequency", 1_000, 1_000_000),
];

/// Inner width of the error box
const BOX_WIDTH: usize = 66;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = match env::var_os("OUT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => fail("OUT_DIR not set", &["build.rs must run under cargo".to_string()]),
    };
    stage_memory_layout(&out_dir);
    check_camera_config(Path::new("pixy.toml"));
}

/// Write memory.x into OUT_DIR and point the linker at it
fn stage_memory_layout(out_dir: &Path) {
    println!("cargo:rerun-if-changed=memory.x");

    if let Err(e) = fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")) {
        fail("Cannot stage memory.x", &[e.to_string()]);
    }
    println!("cargo:rustc-link-search={}", out_dir.display());
}

/// Parse pixy.toml on the host and check every [camera] entry
fn check_camera_config(path: &Path) {
    println!("cargo:rerun-if-changed={}", path.display());

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => fail(
            "pixy.toml not readable",
            &[
                "The firmware embeds pixy.toml as its camera configuration.".to_string(),
                e.to_string(),
            ],
        ),
    };

    let value: toml::Value = match toml::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
            fail("Invalid TOML syntax in pixy.toml", &lines)
        }
    };

    let problems = camera_problems(&value);
    if !problems.is_empty() {
        let lines: Vec<String> = problems.iter().map(|p| format!("- {}", p)).collect();
        fail("Invalid camera configuration", &lines);
    }

    println!("cargo:warning=pixy.toml validated successfully");
}

/// Everything wrong with the [camera] section, empty when it is valid
fn camera_problems(config: &toml::Value) -> Vec<String> {
    let mut problems = Vec::new();

    let Some(table) = config.as_table() else {
        problems.push("pixy.toml must be a table".to_string());
        return problems;
    };

    for section in table.keys().filter(|k| k.as_str() != "camera") {
        problems.push(format!("unknown section [{}]", section));
    }

    let camera = match table.get("camera") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            problems.push("[camera] must be a table".to_string());
            return problems;
        }
        None => return problems,
    };

    for (key, value) in camera {
        let Some(&(_, min, max)) = CAMERA_KEYS.iter().find(|(name, _, _)| name == key) else {
            problems.push(format!("[camera] unknown key '{}'", key));
            continue;
        };

        match value {
            toml::Value::Integer(v) if (min..=max).contains(v) => {}
            toml::Value::Integer(_) => {
                problems.push(format!("[camera] {} must be {}-{}", key, min, max));
            }
            _ => problems.push(format!("[camera] {} must be an integer", key)),
        }
    }

    problems
}

/// Abort the build with a boxed message
///
/// Long lines are wrapped by character count, so multibyte text from
/// toml error messages never gets split mid-character.
fn fail(title: &str, lines: &[String]) -> ! {
    let rule = "═".repeat(BOX_WIDTH);
    let mut out = format!("\n╔{}╗\n", rule);
    push_wrapped(&mut out, &format!("ERROR: {}", title));
    out.push_str(&format!("╠{}╣\n", rule));
    for line in lines {
        push_wrapped(&mut out, line);
    }
    out.push_str(&format!("╚{}╝\n", rule));
    panic!("{}", out);
}

fn push_wrapped(out: &mut String, line: &str) {
    let text = BOX_WIDTH - 4;
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        out.push_str(&format!("║  {:<text$}  ║\n", ""));
        return;
    }
    for chunk in chars.chunks(text) {
        let piece: String = chunk.iter().collect();
        out.push_str(&format!("║  {:<text$}  ║\n", piece));
    }
}
