use std::fs;

const BUNDLED_CONFIG: &str = "src/default_config.toml";
const SECTIONS: [&str; 2] = ["page", "layout"];

fn main() {
    println!("cargo:rerun-if-changed={BUNDLED_CONFIG}");

    let content = fs::read_to_string(BUNDLED_CONFIG)
        .unwrap_or_else(|e| panic!("cannot read {BUNDLED_CONFIG}: {e}"));
    let table = content
        .parse::<toml::Table>()
        .unwrap_or_else(|e| panic!("{BUNDLED_CONFIG} is not valid TOML: {e}"));

    // A missing section would only surface as a runtime warning in Config::compiled_default.
    for section in SECTIONS {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("{BUNDLED_CONFIG} is missing the [{section}] table");
        }
    }
}
