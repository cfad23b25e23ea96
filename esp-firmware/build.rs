// Build-Script: Wird vor dem Kompilieren ausgeführt
// Konfiguriert den Linker für ESP32-C6 Embedded Rust

fn main() {
    // Lade .env file für optionale AP-Credentials
    // Ohne .env gelten die Defaults aus config.rs
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("ℹ️  .env file nicht gefunden: {}", e);
        eprintln!("   Nutze Default-SSID/Passwort aus config.rs");
    }

    // Gebe AP-Credentials an Rust-Compiler weiter (option_env! in config.rs)
    for key in ["AP_SSID", "AP_PASSWORD"] {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
    println!("cargo:rerun-if-changed=.env");

    // Registriere hilfsbereiten Error-Handler für Linker-Fehler
    linker_be_nice();

    // Füge Linker-Skripte hinzu:

    // 1. defmt.x - defmt Logging-Support
    //    Definiert Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // 2. linkall.x - ESP32 Memory-Layout
    //    WICHTIG: Muss als LETZTES kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Error-Handler: Zeigt hilfreiche Tipps bei Linker-Fehlern
// Wird vom Linker als "--error-handling-script" aufgerufen:
//   <exe> <kind> <symbol>
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, symbol, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }
        if let Some(hint) = linker_hint(symbol) {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }
        std::process::exit(0);
    }

    if let Ok(exe) = std::env::current_exe() {
        println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        );
    }
}

/// Tipp zu einem fehlenden Symbol (None = kein bekanntes Muster)
fn linker_hint(symbol: &str) -> Option<&'static str> {
    const HEAP_SYMBOLS: &[&str] = &[
        "free",
        "malloc",
        "calloc",
        "get_free_internal_heap_size",
        "malloc_internal",
        "realloc_internal",
        "calloc_internal",
        "free_internal",
    ];

    if symbol.starts_with("_defmt_") {
        Some("`defmt` not found - is `defmt.x` a linker script and `esp-println` linked?")
    } else if symbol == "_stack_start" {
        Some("Is the linker script `linkall.x` missing?")
    } else if symbol.starts_with("esp_rtos_") {
        Some("`esp-radio` has no scheduler - call `esp_rtos::start` before using WiFi.")
    } else if HEAP_SYMBOLS.contains(&symbol) {
        Some("`esp-alloc` missing - the WiFi driver needs a heap allocator.")
    } else {
        None
    }
}
