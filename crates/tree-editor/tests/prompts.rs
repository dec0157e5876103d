use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;
use tree_editor::prelude::*;

fn queued_editor() -> (Rc<QueuedPrompts>, Editor) {
    let prompts = Rc::new(QueuedPrompts::new());
    let editor = Editor::new(Rc::clone(&prompts));
    (prompts, editor)
}

#[test]
fn test_new_file_prompt_suggests_untitled() {
    let (prompts, editor) = queued_editor();
    editor
        .root()
        .add(editor.new_file("untitled", "", Metadata::new()))
        .unwrap();

    editor.prompt_new_file(editor.root());
    assert_eq!(
        prompts.peek(),
        Some(PromptRequest {
            message: "New file name:".into(),
            initial_value: "untitled1".into(),
        })
    );

    let (request, reply) = prompts.pop().unwrap();
    reply.submit(request.initial_value).unwrap();
    let created = editor.find_by_path("root/untitled1").unwrap();
    assert!(created.is_leaf());
}

#[test]
fn test_answers_arrive_later() {
    let (prompts, editor) = queued_editor();
    let root = editor.root().clone();

    editor.prompt_new_directory(&root);
    editor.prompt_new_file(&root);
    assert_eq!(prompts.len(), 2);
    assert!(root.is_empty());

    // both were asked while `untitled` was free
    let (_, dir_reply) = prompts.pop().unwrap();
    let (file_request, file_reply) = prompts.pop().unwrap();
    assert_eq!(file_request.initial_value, "untitled");

    dir_reply.submit("assets").unwrap();
    file_reply.submit("index.html").unwrap();
    let names: Vec<String> = root.children().iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["assets", "index.html"]);
}

#[test]
fn test_cancelled_prompt_changes_nothing() {
    let (prompts, editor) = queued_editor();
    let file = editor.new_file("keep.txt", "", Metadata::new());
    editor.root().add(file.clone()).unwrap();

    let events = Rc::new(Cell::new(0));
    let counter = Rc::clone(&events);
    editor.on_any(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    editor.prompt_rename(&file);
    editor.prompt_new_directory(editor.root());
    prompts.pop().unwrap().1.cancel().unwrap();
    prompts.pop().unwrap().1.resolve(PromptOutcome::Cancelled).unwrap();

    assert_eq!(file.name(), "keep.txt");
    assert_eq!(editor.root().len(), 1);
    assert_eq!(events.get(), 0);
}

#[test]
fn test_rename_prompt_rejects_sibling_name() {
    let (prompts, editor) = queued_editor();
    let a = editor.new_file("a.rs", "", Metadata::new());
    editor.root().add(a.clone()).unwrap();
    editor
        .root()
        .add(editor.new_file("b.rs", "", Metadata::new()))
        .unwrap();

    editor.prompt_rename(&a);
    let (request, reply) = prompts.pop().unwrap();
    assert_eq!(request.message, "New name:");
    assert_eq!(request.initial_value, "a.rs");

    let err = reply.submit("b.rs").unwrap_err();
    assert!(err.is_duplicate_name());
    assert_eq!(a.name(), "a.rs");
}

#[test]
fn test_headless_prompts_are_cancelled() {
    let editor = Editor::new(Headless);
    let answered = Rc::new(Cell::new(None));
    let slot = Rc::clone(&answered);
    editor.prompt("Anything?", "", move |outcome| {
        slot.set(Some(outcome == PromptOutcome::Cancelled));
        Ok(())
    });
    assert_eq!(answered.get(), Some(true));

    editor.prompt_new_file(editor.root());
    assert!(editor.root().is_empty());
}
