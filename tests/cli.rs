use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, contents).expect("failed to write config");
    path
}

/// A command isolated from the developer's own credentials and config.
fn file_search(config: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("file-search"));
    cmd.arg("--config")
        .arg(config)
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("FILE_SEARCH_CONFIG")
        .env_remove("FILE_SEARCH_FORMAT")
        .env_remove("FILE_SEARCH_API_HOST")
        .env_remove("COMPLETION_ENABLED")
        .env_remove("COMPLETION_CACHE_TTL")
        .env_remove("MCP_TOOLS")
        .env_remove("COMPLETE");
    cmd
}

#[test]
fn version_prints_package_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    file_search(&config)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));

    Ok(())
}

#[test]
fn help_lists_resource_commands() -> Result<(), Box<dyn std::error::Error>> {
    Command::new(assert_cmd::cargo::cargo_bin!("file-search"))
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("store")
                .and(predicate::str::contains("document"))
                .and(predicate::str::contains("query")),
        );

    Ok(())
}

#[test]
fn completion_script_is_generated() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    file_search(&config)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file-search"));

    Ok(())
}

#[test]
fn name_lookup_without_key_explains_itself() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    file_search(&config)
        .args(["store", "get", "Manuals"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("without an API key"));

    Ok(())
}

#[test]
fn identifier_without_key_reaches_authentication() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    file_search(&config)
        .args(["store", "get", "fileSearchStores/abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));

    Ok(())
}

#[test]
fn document_name_needs_a_store() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    file_search(&config)
        .args(["--api-key", "test-key", "document", "get", "guide.pdf"])
        .env("FILE_SEARCH_API_HOST", "http://127.0.0.1:9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a store"));

    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "completion_cache_ttl: [not, a, duration]\n");

    file_search(&config)
        .args(["store", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    Ok(())
}

#[test]
fn mcp_server_starts_without_key() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "mcp_tools: all\n");

    let handshake = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"cli-test","version":"0.0.0"}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
    );

    file_search(&config)
        .arg("mcp")
        .write_stdin(handshake)
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""name":"file-search""#)
                .and(predicate::str::contains("Enabled tool groups: query, list")),
        );

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn store_get_resolves_display_name() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    let _list = server
        .mock("GET", "/v1beta/fileSearchStores")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"fileSearchStores": [
                {"name": "fileSearchStores/abc", "displayName": "Manuals"},
                {"name": "fileSearchStores/xyz", "displayName": "Invoices"}
            ]}"#,
        )
        .create();
    let _get = server
        .mock("GET", "/v1beta/fileSearchStores/abc")
        .with_status(200)
        .with_body(r#"{"name": "fileSearchStores/abc", "displayName": "Manuals"}"#)
        .create();

    file_search(&config)
        .args(["store", "get", "Manuals"])
        .env("FILE_SEARCH_API_HOST", server.url())
        .env("GOOGLE_API_KEY", "test-key")
        .assert()
        .success()
        .stdout(predicate::str::contains("fileSearchStores/abc"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn ambiguous_store_name_lists_identifiers() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    let _list = server
        .mock("GET", "/v1beta/fileSearchStores")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"fileSearchStores": [
                {"name": "fileSearchStores/abc", "displayName": "Manuals"},
                {"name": "fileSearchStores/def", "displayName": "Manuals"}
            ]}"#,
        )
        .create();

    file_search(&config)
        .args(["store", "get", "Manuals"])
        .env("FILE_SEARCH_API_HOST", server.url())
        .env("GOOGLE_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("ambiguous")
                .and(predicate::str::contains("fileSearchStores/abc"))
                .and(predicate::str::contains("fileSearchStores/def")),
        );

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn store_list_json_prints_raw_records() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    let _list = server
        .mock("GET", "/v1beta/fileSearchStores")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"fileSearchStores": [{"name": "fileSearchStores/abc", "displayName": "Manuals"}]}"#)
        .create();

    let assert = file_search(&config)
        .args(["store", "list", "--format", "json"])
        .env("FILE_SEARCH_API_HOST", server.url())
        .env("GOOGLE_API_KEY", "test-key")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["data"][0]["name"], "fileSearchStores/abc");

    Ok(())
}
