use std::collections::BTreeMap;

use anyhow::{bail, Context};
use jemallocator::Jemalloc;
use log::{info, LevelFilter};
use serde::Deserialize;
use serde_json::Value;
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use multicall_batch::{utils::display_value, Call, Multicall, Settings};

/// One entry of the calls file:
/// `{ "call": ["balanceOf(address)(uint256)", "0x..."], "target": "0x...", "returns": [["bal"]] }`
#[derive(Debug, Deserialize)]
struct CallEntry {
    call: Vec<Value>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    returns: Vec<ReturnEntry>,
}

/// `"key"` or `["key", ...]`. Anything after the key names a transform,
/// which cannot be expressed in a file and is ignored.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReturnEntry {
    Key(String),
    Entry(Vec<Value>),
}

impl ReturnEntry {
    fn into_key(self) -> anyhow::Result<String> {
        match self {
            Self::Key(key) => Ok(key),
            Self::Entry(parts) => match parts.into_iter().next() {
                Some(Value::String(key)) => Ok(key),
                _ => bail!("`returns` entries must start with a key string"),
            },
        }
    }
}

impl CallEntry {
    fn into_call(self) -> anyhow::Result<Call> {
        let mut parts = self.call.into_iter();
        let Some(Value::String(signature)) = parts.next() else {
            bail!("`call` must start with a signature string");
        };

        let mut call = Call::signature(signature).args(parts);
        if let Some(target) = &self.target {
            call = call.target_str(target)?;
        }

        for entry in self.returns {
            call = call.returns(entry.into_key()?);
        }

        Ok(call)
    }
}

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .context("Failed to initialise logger")?;

    let path = std::env::args()
        .nth(1)
        .context("Usage: multicall-batch <calls.json>")?;

    // Load configuration
    let settings = Settings::new()
        .context("Failed to load config.yaml. Please ensure it exists and is valid")?;

    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    let entries: Vec<CallEntry> =
        serde_json::from_str(&contents).with_context(|| format!("Invalid calls file {path}"))?;
    let calls = entries
        .into_iter()
        .map(CallEntry::into_call)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let multicall =
        Multicall::from_settings(&settings).context("Failed to create multicall client")?;

    info!(
        "Aggregating {} calls through {}",
        calls.len(),
        multicall.address()
    );

    let output = multicall
        .aggregate(&calls)
        .await
        .context("Aggregate call failed")?;

    info!("Block {}", output.results.block_number);

    let sorted: BTreeMap<_, _> = output.results.transformed.iter().collect();
    for (key, value) in sorted {
        info!("{key} = {}", display_value(value));
    }

    Ok(())
}
