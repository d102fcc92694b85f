//! CLI Tooling
//!
//! Command-line file browser over the drive tree: listing, breadcrumbs,
//! folder creation, material add, cascading delete, bookmarks, and status.
//! Commands are workspace-scoped; the snapshot is loaded on context creation
//! and persisted after every successful mutation.

use crate::bookmarks::BookmarkIndex;
use crate::concurrency::SharedDriveTree;
use crate::config::{ConfigLoader, DriveConfig};
use crate::error::DriveError;
use crate::store::{DriveSnapshot, SledSnapshotStore, SnapshotStore};
use crate::tree::{DriveItem, DriveTree, FileKind, FilePayload, IdGenerator, SourceOrigin};
use crate::types::WorkspaceKey;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// NeuroDrive CLI - workspace file browser for the materials catalog
#[derive(Parser)]
#[command(name = "neurodrive")]
#[command(about = "Hierarchical drive-item browser for the NeuroZsis materials catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace key snapshots are stored under (overrides config)
    #[arg(long)]
    pub workspace: Option<String>,

    /// Snapshot store path (overrides config)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the children of a folder (root if omitted)
    Ls {
        /// Folder id to list
        folder: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the breadcrumb path of a folder
    Path {
        /// Folder id
        folder: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Render the whole hierarchy as an indented tree
    Tree,
    /// Create a folder in the current workspace
    Mkdir {
        /// Folder display name
        name: String,
        /// Parent folder id (root if omitted)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Add a material file
    Add {
        /// File display name
        name: String,
        /// File kind (video, pdf, infographic, text, image)
        #[arg(long)]
        kind: String,
        /// Opaque source reference (URL or storage key)
        #[arg(long)]
        source: String,
        /// Source origin (video-platform, object-storage, external-link)
        #[arg(long, default_value = "external-link")]
        origin: String,
        /// Parent folder id (root if omitted)
        #[arg(long)]
        parent: Option<String>,
        /// Optional cover image reference
        #[arg(long)]
        cover: Option<String>,
    },
    /// Delete an item; folders are removed with all of their contents
    Rm {
        /// Item id
        item: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Manage bookmarks
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Show workspace item counts
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Destination path
        #[arg(long, default_value = "config.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum BookmarkCommands {
    /// Bookmark an item
    Add {
        /// Item id
        item: String,
    },
    /// Remove a bookmark
    Rm {
        /// Item id
        item: String,
    },
    /// List bookmarked items
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Execution context: workspace key, loaded tree, bookmark index, store.
pub struct CliContext {
    workspace: WorkspaceKey,
    store: Box<dyn SnapshotStore>,
    tree: SharedDriveTree,
    bookmarks: Mutex<BookmarkIndex>,
    ids: IdGenerator,
}

impl CliContext {
    /// Build a context from config plus CLI overrides, loading the workspace
    /// snapshot from the sled store.
    pub fn new(
        workspace: Option<String>,
        store_path: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Result<Self, DriveError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        let workspace = workspace.unwrap_or_else(|| config.workspace.clone());
        let resolved_store = match store_path {
            Some(path) => path,
            None => config.storage.resolve_store_path()?,
        };
        let store = SledSnapshotStore::open(&resolved_store)?;
        Self::with_store(workspace, Box::new(store))
    }

    /// Build a context over an already-open store. Used directly by tests
    /// with the in-memory adapter.
    pub fn with_store(
        workspace: WorkspaceKey,
        store: Box<dyn SnapshotStore>,
    ) -> Result<Self, DriveError> {
        let tree = match store.load(&workspace)? {
            Some(snapshot) => DriveTree::from_snapshot(snapshot.items)?,
            None => DriveTree::new(),
        };
        let bookmarks = store.load_bookmarks(&workspace)?.unwrap_or_default();
        info!(workspace = %workspace, items = tree.len(), "loaded workspace");
        let ids = IdGenerator::new(workspace.clone());
        Ok(CliContext {
            workspace,
            store,
            tree: SharedDriveTree::new(tree),
            bookmarks: Mutex::new(bookmarks),
            ids,
        })
    }

    /// Load the effective configuration for this invocation.
    pub fn load_config(config_path: Option<&std::path::Path>) -> Result<DriveConfig, DriveError> {
        ConfigLoader::load(config_path)
    }

    /// Execute a command and render its output.
    pub fn execute(&self, command: &Commands) -> Result<String, DriveError> {
        match command {
            Commands::Ls { folder, format } => self.cmd_ls(folder.as_deref(), format),
            Commands::Path { folder, format } => self.cmd_path(folder, format),
            Commands::Tree => self.cmd_tree(),
            Commands::Mkdir { name, parent } => self.cmd_mkdir(name, parent.clone()),
            Commands::Add {
                name,
                kind,
                source,
                origin,
                parent,
                cover,
            } => self.cmd_add(name, kind, source, origin, parent.clone(), cover.clone()),
            Commands::Rm { item, yes, format } => self.cmd_rm(item, *yes, format),
            Commands::Bookmark { command } => self.cmd_bookmark(command),
            Commands::Status { format } => self.cmd_status(format),
            Commands::Config { command } => match command {
                ConfigCommands::Init { path, force } => {
                    ConfigLoader::write_default(path, *force)?;
                    Ok(format!("Wrote default configuration to {}", path.display()))
                }
            },
        }
    }

    fn cmd_ls(&self, folder: Option<&str>, format: &str) -> Result<String, DriveError> {
        let items = self.tree.list_children(folder);
        if format == "json" {
            return Ok(serde_json::to_string_pretty(&json!({
                "folder": folder,
                "count": items.len(),
                "items": items,
            }))?);
        }
        if items.is_empty() {
            return Ok("(empty)".to_string());
        }
        Ok(render_item_table(&items))
    }

    fn cmd_path(&self, folder: &str, format: &str) -> Result<String, DriveError> {
        let ancestors = self.tree.resolve_ancestor_path(folder)?;
        let target = self.tree.get(folder);
        if format == "json" {
            return Ok(serde_json::to_string_pretty(&json!({
                "ancestors": ancestors,
                "folder": target,
            }))?);
        }
        let mut segments = vec!["Root".to_string()];
        for ancestor in &ancestors {
            segments.push(ancestor.name.clone());
        }
        if let Some(item) = &target {
            segments.push(item.name.clone());
        }
        Ok(segments.join(" / "))
    }

    fn cmd_tree(&self) -> Result<String, DriveError> {
        let mut lines = Vec::new();
        // Depth-first over the adjacency view; explicit stack, children
        // reversed so siblings render in insertion order.
        let mut stack: Vec<(DriveItem, usize)> = self
            .tree
            .list_children(None)
            .into_iter()
            .rev()
            .map(|item| (item, 0))
            .collect();
        while let Some((item, depth)) = stack.pop() {
            let indent = "  ".repeat(depth);
            if item.is_folder() {
                lines.push(format!("{}{}/ ({})", indent, item.name.blue(), item.id));
                for child in self.tree.list_children(Some(&item.id)).into_iter().rev() {
                    stack.push((child, depth + 1));
                }
            } else {
                let kind = item
                    .file_payload()
                    .map(|p| p.file_kind.to_string())
                    .unwrap_or_default();
                lines.push(format!("{}{} [{}] ({})", indent, item.name, kind, item.id));
            }
        }
        if lines.is_empty() {
            return Ok("(empty)".to_string());
        }
        Ok(lines.join("\n"))
    }

    fn cmd_mkdir(&self, name: &str, parent: Option<String>) -> Result<String, DriveError> {
        let id = self.ids.next_folder_id(name);
        self.tree
            .insert(DriveItem::folder(id.clone(), name, parent))?;
        self.persist_tree()?;
        Ok(format!("Created folder '{}' ({})", name, id))
    }

    fn cmd_add(
        &self,
        name: &str,
        kind: &str,
        source: &str,
        origin: &str,
        parent: Option<String>,
        cover: Option<String>,
    ) -> Result<String, DriveError> {
        let file_kind: FileKind = kind.parse().map_err(DriveError::InvalidArgument)?;
        let source_origin: SourceOrigin = origin.parse().map_err(DriveError::InvalidArgument)?;
        let id = self.ids.next_file_id(name);
        self.tree.insert(DriveItem::file(
            id.clone(),
            name,
            parent,
            FilePayload {
                file_kind,
                source: source.to_string(),
                source_origin,
                cover_image: cover,
            },
        ))?;
        self.persist_tree()?;
        Ok(format!("Added {} '{}' ({})", file_kind, name, id))
    }

    fn cmd_rm(&self, item_id: &str, yes: bool, format: &str) -> Result<String, DriveError> {
        let target = match self.tree.get(item_id) {
            Some(item) => item,
            None => {
                // Idempotent delete: nothing there is not an error.
                if format == "json" {
                    return Ok(serde_json::to_string_pretty(&json!({
                        "deleted": [],
                        "count": 0,
                        "bookmarks_pruned": 0,
                    }))?);
                }
                return Ok("Nothing to delete.".to_string());
            }
        };

        if !yes {
            let prompt = if target.is_folder() {
                format!("Delete folder '{}' and all of its contents?", target.name)
            } else {
                format!("Delete file '{}'?", target.name)
            };
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .map_err(|e| {
                    DriveError::ConfigError(format!("Confirmation prompt failed: {}", e))
                })?;
            if !confirmed {
                return Ok("Aborted.".to_string());
            }
        }

        let removed = self.tree.delete_subtree(item_id)?;
        self.persist_tree()?;
        let pruned = {
            let mut bookmarks = self.bookmarks.lock();
            let pruned = bookmarks.reconcile(&removed);
            self.store.save_bookmarks(&self.workspace, &bookmarks)?;
            pruned
        };
        info!(workspace = %self.workspace, id = %item_id, removed = removed.len(), "removed subtree");

        let mut deleted: Vec<&String> = removed.iter().collect();
        deleted.sort();
        if format == "json" {
            return Ok(serde_json::to_string_pretty(&json!({
                "deleted": deleted,
                "count": removed.len(),
                "bookmarks_pruned": pruned,
            }))?);
        }
        Ok(format!(
            "Deleted '{}' ({} item{}).",
            target.name,
            removed.len(),
            if removed.len() == 1 { "" } else { "s" }
        ))
    }

    fn cmd_bookmark(&self, command: &BookmarkCommands) -> Result<String, DriveError> {
        match command {
            BookmarkCommands::Add { item } => {
                let target = self
                    .tree
                    .get(item)
                    .ok_or_else(|| DriveError::ItemNotFound(item.clone()))?;
                let added = {
                    let mut bookmarks = self.bookmarks.lock();
                    let added = bookmarks.add(item.clone());
                    self.store.save_bookmarks(&self.workspace, &bookmarks)?;
                    added
                };
                if added {
                    Ok(format!("Bookmarked '{}'", target.name))
                } else {
                    Ok(format!("'{}' is already bookmarked", target.name))
                }
            }
            BookmarkCommands::Rm { item } => {
                let removed = {
                    let mut bookmarks = self.bookmarks.lock();
                    let removed = bookmarks.remove(item);
                    self.store.save_bookmarks(&self.workspace, &bookmarks)?;
                    removed
                };
                if removed {
                    Ok(format!("Removed bookmark for '{}'", item))
                } else {
                    Ok(format!("No bookmark for '{}'", item))
                }
            }
            BookmarkCommands::List { format } => {
                let bookmarks = self.bookmarks.lock();
                let items: Vec<DriveItem> = bookmarks
                    .iter()
                    .filter_map(|id| self.tree.get(id))
                    .collect();
                if format == "json" {
                    return Ok(serde_json::to_string_pretty(&json!({
                        "count": items.len(),
                        "items": items,
                    }))?);
                }
                if items.is_empty() {
                    return Ok("No bookmarks.".to_string());
                }
                Ok(render_item_table(&items))
            }
        }
    }

    fn cmd_status(&self, format: &str) -> Result<String, DriveError> {
        let snapshot = self.tree.snapshot();
        let folders = snapshot.iter().filter(|item| item.is_folder()).count();
        let files = snapshot.len() - folders;
        let mut by_kind: std::collections::BTreeMap<String, usize> = Default::default();
        for item in &snapshot {
            if let Some(payload) = item.file_payload() {
                *by_kind.entry(payload.file_kind.to_string()).or_default() += 1;
            }
        }
        let bookmark_count = self.bookmarks.lock().len();

        if format == "json" {
            return Ok(serde_json::to_string_pretty(&json!({
                "workspace": self.workspace,
                "total": snapshot.len(),
                "folders": folders,
                "files": files,
                "by_kind": by_kind,
                "bookmarks": bookmark_count,
            }))?);
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Workspace", "Total", "Folders", "Files", "Bookmarks"]);
        table.add_row(vec![
            Cell::new(&self.workspace),
            Cell::new(snapshot.len()),
            Cell::new(folders),
            Cell::new(files),
            Cell::new(bookmark_count),
        ]);
        let mut out = table.to_string();
        if !by_kind.is_empty() {
            let kinds: Vec<String> = by_kind
                .iter()
                .map(|(kind, count)| format!("{}: {}", kind, count))
                .collect();
            out.push_str(&format!("\nFiles by kind: {}", kinds.join(", ")));
        }
        Ok(out)
    }

    fn persist_tree(&self) -> Result<(), DriveError> {
        let snapshot = DriveSnapshot::new(self.tree.snapshot());
        self.store.save(&self.workspace, &snapshot)?;
        Ok(())
    }
}

fn render_item_table(items: &[DriveItem]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Id", "Name", "Type", "Kind", "Source"]);
    for item in items {
        let (kind, source) = match item.file_payload() {
            Some(payload) => (payload.file_kind.to_string(), payload.source.clone()),
            None => (String::new(), String::new()),
        };
        table.add_row(vec![
            Cell::new(&item.id),
            Cell::new(&item.name),
            Cell::new(if item.is_folder() { "folder" } else { "file" }),
            Cell::new(kind),
            Cell::new(source),
        ]);
    }
    table.to_string()
}
