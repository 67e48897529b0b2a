use std::path::PathBuf;

use qdexport::exec::CommandDescriptor;
use qdexport_test_utils::builders::ExportRequestBuilder;

#[test]
fn build_is_deterministic() {
    let request = ExportRequestBuilder::new()
        .compiler("/usr/bin/quarkdown")
        .source("/work/docs/main.qd")
        .output_dir("/work/out")
        .build();

    assert_eq!(
        CommandDescriptor::build(&request),
        CommandDescriptor::build(&request)
    );
}

#[test]
fn composes_the_compiler_invocation() {
    let request = ExportRequestBuilder::new()
        .compiler("/usr/bin/quarkdown")
        .source("/work/docs/main.qd")
        .output_dir("/work/out")
        .build();

    let descriptor = CommandDescriptor::build(&request);

    assert_eq!(descriptor.command, "/usr/bin/quarkdown");
    assert_eq!(
        descriptor.args,
        vec!["c", "main.qd", "--pdf", "-o", "/work/out"]
    );
    assert_eq!(descriptor.cwd, PathBuf::from("/work/docs"));
}

#[test]
fn bare_source_file_runs_from_current_dir() {
    let request = ExportRequestBuilder::new().source("main.qd").build();

    let descriptor = CommandDescriptor::build(&request);
    assert_eq!(descriptor.cwd, PathBuf::from("."));
}

#[test]
fn display_command_joins_every_part() {
    let request = ExportRequestBuilder::new()
        .compiler("quarkdown")
        .source("doc.qd")
        .output_dir("out")
        .build();

    let descriptor = CommandDescriptor::build(&request);
    assert_eq!(
        descriptor.display_command(),
        "quarkdown c doc.qd --pdf -o out"
    );
}
