mod common;

use std::sync::Arc;

use common::FakeNetwork;
use poke_rand::model::manifest::CacheManifest;
use poke_rand::worker::lifecycle::{WorkerRegistration, WorkerState};
use poke_rand::worker::request::AssetRequest;
use poke_rand::worker::storage::{CacheStorage, DiskCacheStorage, MemoryCacheStorage};

const SCOPE: &str = "https://cards.example/quiz/";

fn shell_network() -> FakeNetwork {
    FakeNetwork::new()
        .serve("https://cards.example/quiz/", b"<html>root</html>")
        .serve("https://cards.example/quiz/index.html", b"<html>card</html>")
        .serve("https://cards.example/quiz/styles.css", b"body{}")
        .serve("https://cards.example/quiz/app.js", b"console.log(1)")
        .serve("https://cards.example/quiz/icons/icon-192.png", b"\x89PNG-192")
        .serve("https://cards.example/quiz/icons/icon-512.png", b"\x89PNG-512")
}

fn manifest(version: &str) -> CacheManifest {
    CacheManifest {
        cache_version: version.into(),
        assets: vec![
            "./".into(),
            "index.html".into(),
            "styles.css".into(),
            "app.js".into(),
            "icons/icon-192.png".into(),
            "icons/icon-512.png".into(),
        ],
        entry_point: "index.html".into(),
    }
}

#[test]
fn version_bump_sweeps_previous_generation() {
    let storage = Arc::new(MemoryCacheStorage::new());
    let reg = WorkerRegistration::new(SCOPE, storage.clone(), Arc::new(shell_network())).unwrap();

    let v1 = reg.register(manifest("v1")).unwrap();
    assert_eq!(storage.entries("v1").unwrap().len(), 6);

    let v2 = reg.register(manifest("v2")).unwrap();

    assert_eq!(storage.keys().unwrap(), vec!["v2".to_string()]);
    assert!(storage.entries("v1").unwrap().is_empty());
    assert_eq!(storage.entries("v2").unwrap().len(), 6);
    assert_eq!(v1.state(), WorkerState::Redundant);
    assert_eq!(v2.state(), WorkerState::Activated);
}

#[test]
fn stray_caches_are_swept_too() {
    let storage = Arc::new(MemoryCacheStorage::new());
    storage.open("poke-rand-v0").unwrap();
    storage.open("unrelated").unwrap();
    let reg = WorkerRegistration::new(SCOPE, storage.clone(), Arc::new(shell_network())).unwrap();

    reg.install_update(manifest("v3")).unwrap();
    assert!(reg.active().is_none());
    assert_eq!(storage.keys().unwrap().len(), 3);

    let active = reg.activate_waiting().unwrap().unwrap();
    assert_eq!(active.version(), "v3");
    assert_eq!(storage.keys().unwrap(), vec!["v3".to_string()]);
}

#[test]
fn cached_static_asset_is_served_without_network() {
    let network = Arc::new(shell_network());
    let reg = WorkerRegistration::new(SCOPE, Arc::new(MemoryCacheStorage::new()), network.clone()).unwrap();
    reg.register(manifest("v1")).unwrap();

    // The origin changes after install; the cache still answers.
    network.set_body("https://cards.example/quiz/styles.css", b"body{color:red}");
    let calls = network.calls();

    let response = reg
        .fetch(&AssetRequest::get("https://cards.example/quiz/styles.css"))
        .unwrap();

    assert_eq!(response.body, b"body{}".to_vec());
    assert_eq!(network.calls(), calls);
}

#[test]
fn offline_navigation_gets_entry_point() {
    let network = Arc::new(shell_network());
    let reg = WorkerRegistration::new(SCOPE, Arc::new(MemoryCacheStorage::new()), network.clone()).unwrap();
    reg.register(manifest("v1")).unwrap();
    network.go_offline();

    let response = reg
        .fetch(&AssetRequest::navigate("https://cards.example/quiz/some/deep/link"))
        .unwrap();

    assert_eq!(response.body, b"<html>card</html>".to_vec());
}

#[test]
fn online_navigation_prefers_network() {
    let network = Arc::new(shell_network());
    let reg = WorkerRegistration::new(SCOPE, Arc::new(MemoryCacheStorage::new()), network.clone()).unwrap();
    reg.register(manifest("v1")).unwrap();
    network.set_body("https://cards.example/quiz/index.html", b"<html>fresh</html>");

    let response = reg
        .fetch(&AssetRequest::navigate("https://cards.example/quiz/index.html"))
        .unwrap();

    assert_eq!(response.body, b"<html>fresh</html>".to_vec());
}

#[test]
fn requests_outside_scope_hit_network() {
    let network = Arc::new(shell_network().serve("https://pokeapi.co/api/v2/pokemon/1", b"{}"));
    let reg = WorkerRegistration::new(SCOPE, Arc::new(MemoryCacheStorage::new()), network.clone()).unwrap();
    reg.register(manifest("v1")).unwrap();
    let calls = network.calls();

    let response = reg.fetch(&AssetRequest::get("https://pokeapi.co/api/v2/pokemon/1")).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(network.calls(), calls + 1);
}

#[test]
fn no_worker_means_plain_network() {
    let network = Arc::new(shell_network());
    let reg = WorkerRegistration::new(SCOPE, Arc::new(MemoryCacheStorage::new()), network.clone()).unwrap();
    network.go_offline();

    assert!(reg.fetch(&AssetRequest::get("https://cards.example/quiz/app.js")).is_err());
}

#[test]
fn disk_cache_serves_after_restart() {
    let mut root = std::env::temp_dir();
    root.push(format!("poke_rand_worker_{}_{}", std::process::id(), rand::random::<u32>()));

    {
        let reg = WorkerRegistration::new(
            SCOPE,
            Arc::new(DiskCacheStorage::new(root.clone()).unwrap()),
            Arc::new(shell_network()),
        )
        .unwrap();
        reg.register(manifest("v1")).unwrap();
    }

    // A fresh process starting with the network down.
    let network = Arc::new(shell_network());
    network.go_offline();
    let reg = WorkerRegistration::new(
        SCOPE,
        Arc::new(DiskCacheStorage::new(root.clone()).unwrap()),
        network.clone(),
    )
    .unwrap();
    reg.register(manifest("v1")).unwrap();

    let icon = reg
        .fetch(&AssetRequest::image("https://cards.example/quiz/icons/icon-512.png"))
        .unwrap();
    assert_eq!(icon.body, b"\x89PNG-512".to_vec());

    std::fs::remove_dir_all(root).ok();
}

#[test]
fn unreadable_cache_index_falls_back_to_network() {
    let mut root = std::env::temp_dir();
    root.push(format!("poke_rand_worker_{}_{}", std::process::id(), rand::random::<u32>()));

    let network = Arc::new(shell_network());
    let reg = WorkerRegistration::new(
        SCOPE,
        Arc::new(DiskCacheStorage::new(root.clone()).unwrap()),
        network.clone(),
    )
    .unwrap();
    reg.register(manifest("v1")).unwrap();

    std::fs::write(root.join("v1").join("entries.json"), b"{ truncated").unwrap();
    network.set_body("https://cards.example/quiz/icons/icon-512.png", b"\x89PNG-live");
    let calls = network.calls();

    let icon = reg
        .fetch(&AssetRequest::image("https://cards.example/quiz/icons/icon-512.png"))
        .unwrap();

    assert_eq!(icon.body, b"\x89PNG-live".to_vec());
    assert_eq!(network.calls(), calls + 1);

    std::fs::remove_dir_all(root).ok();
}
