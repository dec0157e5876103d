//! Scripted editing session that prints every event and the final tree
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example session

use anyhow::Result;
use std::rc::Rc;
use tree_editor::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let prompts = Rc::new(QueuedPrompts::new());
    let editor = Editor::with_options(Rc::clone(&prompts), EditorOptions::new().expand_root(true));

    editor.on_any(|event| {
        println!("[{}] {}", event.name, event.context.path());
        Ok(())
    });

    // Build a small project
    let src = editor.new_directory("src", Metadata::new());
    editor.root().add(src.clone())?;
    src.add(editor.new_file("main.ts", "console.log('hi')", Metadata::new()))?;
    editor
        .root()
        .add(editor.new_file("README.md", "# demo", Metadata::new()))?;

    // Name collisions are rejected without touching the tree
    if let Err(err) = editor
        .root()
        .add(editor.new_file("README.md", "", Metadata::new()))
    {
        println!("rejected: {}", err);
    }

    // Answer the prompts the way a dialog would
    src.select()?;
    editor.prompt_rename(&src);
    if let Some((request, reply)) = prompts.pop() {
        println!("prompt `{}` (initially `{}`)", request.message, request.initial_value);
        reply.submit("lib")?;
    }

    let created = editor.new_file_in_selection()?;
    println!("created: {:?}", created.map(|file| file.path()));

    println!();
    println!("Directory Structure:");
    println!("═══════════════════════════════");
    for node in editor.root().walk(TraversalOrder::PreOrder) {
        let indent = "  ".repeat(node.depth());
        let icon = match node.kind() {
            NodeKind::Container => "📁",
            NodeKind::Leaf => "📄",
        };
        println!("{}{} {}", indent, icon, node.name());
    }

    Ok(())
}
