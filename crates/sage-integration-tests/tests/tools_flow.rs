//! Read-only and write tools against a host vault.

mod common;

use common::Harness;
use serde_json::json;

#[tokio::test]
async fn test_write_then_read_search_and_grep() {
    let h = Harness::new(&[("Projects/sage.md", "TODO: ship\n")]);

    let written = h
        .call(
            "write_file",
            json!({"path": "Daily/today.md", "content": "todo: call the plumber\n"}),
        )
        .await;
    assert_eq!(written["message"], "File created successfully");
    assert!(h.host_path("Daily/today.md").exists());

    let read = h.call("read_file", json!({"path": "Daily/today.md"})).await;
    assert_eq!(read["name"], "today.md");
    assert_eq!(read["content"], "todo: call the plumber\n");

    let found = h.call("search_files", json!({"query": "sage"})).await;
    assert_eq!(found[0]["file"], "Projects/sage.md");

    let grep = h.call("grep_files", json!({"pattern": "todo"})).await;
    assert_eq!(grep["matchedFiles"], 2);
    assert_eq!(grep["totalMatches"], 2);
}

#[tokio::test]
async fn test_list_folder_skips_hidden_entries() {
    let h = Harness::new(&[
        ("Notes/a.md", ""),
        ("top.md", ""),
        (".obsidian/workspace.json", "{}"),
    ]);

    let listing = h.call("list_folder", json!({"path": "/"})).await;
    assert_eq!(listing["success"], true);
    let folders: Vec<&str> = listing["folders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(folders, vec!["Notes"]);
    assert_eq!(listing["files"][0]["path"], "top.md");
}

#[tokio::test]
async fn test_paths_cannot_escape_the_vault() {
    let h = Harness::new(&[("a.md", "")]);
    std::fs::write(h.root().parent().unwrap().join("outside.md"), "secret").ok();

    let read = h.call("read_file", json!({"path": "../outside.md"})).await;
    assert_eq!(read["success"], false);

    let delete = h.call("delete_file", json!({"path": "../a.md"})).await;
    assert_eq!(delete["success"], false);
    assert!(h.manager.all().is_empty());
}

#[tokio::test]
async fn test_validation_errors_queue_nothing() {
    let h = Harness::new(&[("a.md", ""), ("b.md", "")]);

    let missing = h.call("delete_file", json!({"path": "nope.md"})).await;
    assert_eq!(missing["success"], false);
    assert_eq!(missing["path"], "nope.md");

    let clash = h
        .call("rename_file", json!({"oldPath": "a.md", "newPath": "b.md"}))
        .await;
    assert_eq!(clash["success"], false);

    let unknown = h.call("format_disk", json!({})).await;
    assert_eq!(unknown["error"], "Unknown tool");

    assert!(h.manager.all().is_empty());
}

#[test]
fn test_definitions_cover_every_tool() {
    let registry = sage_tools::ToolRegistry::with_defaults();
    let names: Vec<String> = registry
        .all_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "create_folder",
            "delete_file",
            "delete_folder",
            "grep_files",
            "list_folder",
            "move_file",
            "move_folder",
            "read_file",
            "rename_file",
            "search_files",
            "write_file",
        ]
    );
}
