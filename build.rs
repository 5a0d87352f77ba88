use std::path::Path;

fn main() {
    let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");

    println!("cargo:rerun-if-changed={}", env_path.display());
    println!("cargo:rerun-if-env-changed=LOG_MONITOR_API_URL");

    if !env_path.exists() {
        println!("cargo:warning=no .env at {}, using the default backend address", env_path.display());
        return;
    }

    let entries = match dotenvy::from_path_iter(&env_path) {
        Ok(entries) => entries,
        Err(e) => {
            println!("cargo:warning=ignoring unreadable {}: {}", env_path.display(), e);
            return;
        }
    };
    for entry in entries {
        match entry {
            Ok((key, val)) => println!("cargo:rustc-env={}={}", key, val),
            Err(e) => println!("cargo:warning=skipping bad .env line: {}", e),
        }
    }
}
