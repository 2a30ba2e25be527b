#![allow(dead_code)]

use webdsl_config::BuildConfig;
use webdsl_schema::{Builder, Error, ResolvedModel, load::MemoryLoader};

pub const ROOT: &str = "app/root.wdsl";

pub const WEBPAGE: &str = "Webpage App\n title: \"Test\"\nend\n";

/// Build an in-memory repository; the first file is the root.
pub fn build_files(files: &[(&str, &str)], config: BuildConfig) -> Result<ResolvedModel, Error> {
    let loader = files
        .iter()
        .fold(MemoryLoader::new(), |loader, (path, text)| {
            loader.with_file(path, *text)
        });

    Builder::new(&loader).with_config(config).build(files[0].0)
}

/// Build a single root file that already carries a webpage.
pub fn build(text: &str) -> Result<ResolvedModel, Error> {
    let text = format!("{WEBPAGE}{text}");

    build_files(&[(ROOT, text.as_str())], BuildConfig::default())
}

pub fn json<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}
