//! Fetch a creature's official artwork and write 192px / 512px app icons.
//!
//! Usage: `update_icons [--id 25] [--dir icons]`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use poke_rand::config::load_config;
use poke_rand::engine::data_client::{http_client, PokeApiClient};
use poke_rand::engine::icons::icons_for_creature;
use poke_rand::worker::network::HttpNetwork;

struct Args {
    id: u32,
    dir: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        id: 25,
        dir: PathBuf::from("icons"),
    };

    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--id" => {
                let raw = it.next().context("--id needs a value")?;
                args.id = raw.parse().with_context(|| format!("invalid id '{raw}'"))?;
            }
            "--dir" => {
                args.dir = PathBuf::from(it.next().context("--dir needs a value")?);
            }
            other => bail!("unknown argument '{other}' (expected --id N or --dir DIR)"),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    poke_rand::init_tracing();

    let args = parse_args()?;
    let config = load_config();
    let http = http_client()?;
    let api = PokeApiClient::new(http.clone(), &config.api_base);
    let network = HttpNetwork::new(http);

    let written = icons_for_creature(&api, &network, args.id, &args.dir)?;
    for path in written {
        println!("Saved {}", path.display());
    }
    Ok(())
}
