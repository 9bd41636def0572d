// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `dolly`: command-line front end for the shot previewer.
//!
//! Preferences are read from the config store first; flags override them for
//! this run, and `--save-prefs` writes the merged result back.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod pose;
mod preview;

use anyhow::{Context, Result};
use clap::Parser;
use dolly_app_core::config::ConfigService;
use dolly_app_core::prefs::PreviewPrefs;
use dolly_app_core::prefs_port::PrefsPort;
use dolly_config_fs::FsConfigStore;
use dolly_loader::deeplink::{link_for_model, parse_link};
use reqwest::Url;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command, LinkArgs};

fn prefs_service(args: &Args) -> Result<ConfigService<FsConfigStore>> {
    let store = match &args.config_dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    Ok(ConfigService::new(store))
}

fn run_link(args: &LinkArgs) -> Result<String> {
    if args.decode {
        let model = parse_link(&args.value)?;
        return Ok(model.unwrap_or_default());
    }
    let page = Url::parse(&args.page).with_context(|| format!("invalid page `{}`", args.page))?;
    Ok(link_for_model(&page, &args.value).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let service = prefs_service(&args)?;
    let mut prefs: PreviewPrefs = service.load_prefs().unwrap_or_default();

    match &args.cmd {
        Command::Pose(pose_args) => {
            let params = pose_args.shot.apply(&mut prefs.shot);
            println!("{}", pose::pose_table(pose_args, &params));
        }
        Command::Load(load_args) => preview::run_load(load_args, &mut prefs).await?,
        Command::Manifest(manifest_args) => {
            preview::run_manifest(manifest_args, &mut prefs).await?;
        }
        Command::Link(link_args) => println!("{}", run_link(link_args)?),
    }

    if args.save_prefs {
        service.save_prefs(&prefs);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use dolly_app_core::prefs::ReadModePref;

    use super::*;

    fn link_args(argv: &[&str]) -> LinkArgs {
        let argv = ["dolly", "link"].iter().chain(argv).copied();
        match Args::try_parse_from(argv).unwrap().cmd {
            Command::Link(l) => l,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn link_build_and_decode_agree() {
        let built = run_link(&link_args(&["/models/a b.glb", "--page", "https://x.test/view"]))
            .unwrap();
        assert!(built.starts_with("https://x.test/view?model="));
        let decoded = run_link(&link_args(&["--decode", built.as_str()])).unwrap();
        assert_eq!(decoded, "models/a b.glb");
    }

    #[test]
    fn decode_without_model_prints_nothing() {
        assert_eq!(
            run_link(&link_args(&["--decode", "https://x.test/"])).unwrap(),
            ""
        );
        assert!(run_link(&link_args(&["--decode", "nope"])).is_err());
    }

    #[test]
    fn prefs_round_trip_through_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let args =
            Args::try_parse_from(["dolly", "--config-dir", dir_arg, "link", "a.glb"]).unwrap();
        let service = prefs_service(&args).unwrap();
        assert!(service.load_prefs().is_none());

        let mut prefs = PreviewPrefs::default();
        prefs.loader.read_mode = ReadModePref::Bulk;
        prefs.loader.last_remote = Some("models/a.glb".into());
        service.save_prefs(&prefs);

        let reopened = prefs_service(&args).unwrap();
        assert_eq!(reopened.load_prefs(), Some(prefs));
    }
}
