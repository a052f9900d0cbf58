//! The per-run owner of all output buffers and the insertion-splicing protocol.
//!
//! One `GeneratorContext` exists per generation run. Generators create named
//! output files exactly once, and any later invocation may splice content
//! into a previously emitted insertion point. Ordering is guaranteed purely
//! by invocation order: the exclusive `&mut` borrow taken by each writer
//! keeps writers strictly sequential, so no locking is needed.

use crate::descriptor::FileDescriptor;
use crate::error::CodeGenError;
use crate::output::OutputStreamProvider;
use std::collections::BTreeMap;
use std::io;
use std::io::Write;

/// The magic text that materializes an insertion point inside a marker line.
const INSERTION_POINT_MAGIC_OPEN: &str = "@@schemagen_insertion_point(";
const INSERTION_POINT_MAGIC_CLOSE: &str = ")";

/// Formats the magic text for a named insertion point.
#[must_use]
pub fn insertion_point_magic(point: &str) -> String {
    format!("{INSERTION_POINT_MAGIC_OPEN}{point}{INSERTION_POINT_MAGIC_CLOSE}")
}

/// Owns the set of named output buffers for one generation run.
#[derive(Debug)]
pub struct GeneratorContext {
    /// Output file name -> accumulated content. `BTreeMap` for deterministic
    /// finalization order.
    files: BTreeMap<String, String>,

    /// Names of every schema file parsed for this run, in parse order.
    parsed_files: Vec<String>,
}

impl GeneratorContext {
    #[must_use]
    pub fn new(parsed_files: Vec<String>) -> Self {
        Self {
            files: BTreeMap::new(),
            parsed_files,
        }
    }

    /// Builds a context whose parsed-file list is taken from a descriptor set.
    #[must_use]
    pub fn for_files(files: &[FileDescriptor]) -> Self {
        Self::new(files.iter().map(|file| file.name.clone()).collect())
    }

    /// Names of every schema file parsed for this run.
    #[must_use]
    pub fn parsed_files(&self) -> &[String] {
        &self.parsed_files
    }

    /// Creates a new named output file and returns a writer appending to it.
    ///
    /// # Errors
    ///
    /// Returns `CodeGenError::DuplicateFile` if `name` was already created in
    /// this run: every output file has exactly one creator.
    pub fn create_file(&mut self, name: &str) -> Result<FileWriter<'_>, CodeGenError> {
        if self.files.contains_key(name) {
            return Err(CodeGenError::DuplicateFile(name.to_string()));
        }
        let buffer: &mut String = self.files.entry(name.to_string()).or_default();
        Ok(FileWriter { buffer })
    }

    /// Opens a writer that splices content immediately before the first
    /// marker line of insertion point `point` in file `name`.
    ///
    /// Every line written through the returned writer inherits the marker
    /// line's exact leading whitespace. Content is spliced when the writer is
    /// dropped; requesting insertion again at the same point places the new
    /// content after everything inserted earlier.
    ///
    /// # Errors
    ///
    /// Returns `CodeGenError::UnknownFile` if `name` was never created, or
    /// `CodeGenError::UnknownPoint` if no marker line for `point` has been
    /// emitted in that file.
    pub fn open_for_insert(
        &mut self,
        name: &str,
        point: &str,
    ) -> Result<InsertWriter<'_>, CodeGenError> {
        let Some(buffer) = self.files.get_mut(name) else {
            return Err(CodeGenError::UnknownFile(name.to_string()));
        };
        let magic: String = insertion_point_magic(point);
        let Some((offset, indent)) = find_marker_line(buffer, &magic) else {
            return Err(CodeGenError::UnknownPoint {
                file: name.to_string(),
                point: point.to_string(),
            });
        };
        Ok(InsertWriter {
            buffer,
            offset,
            indent,
            pending: String::new(),
        })
    }

    /// Content of a created output file, if any. Intended for inspection and
    /// tests; generators should use the writer operations.
    #[must_use]
    pub fn file_content(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// Consumes the context and returns the finished buffers by name.
    #[must_use]
    pub fn into_files(self) -> BTreeMap<String, String> {
        self.files
    }

    /// Hands every buffer to the output stream provider, marker lines
    /// retained verbatim so downstream tooling can re-run insertion against
    /// the emitted artifact.
    ///
    /// Consuming `self` makes insertion against a finalized run a compile
    /// error rather than a protocol violation to detect at runtime.
    ///
    /// # Errors
    ///
    /// Returns `CodeGenError::IoError` if the provider fails to create or
    /// write any sink.
    pub fn finalize(self, provider: &mut dyn OutputStreamProvider) -> Result<(), CodeGenError> {
        for (name, content) in &self.files {
            let mut sink: Box<dyn Write> = provider.create(name)?;
            sink.write_all(content.as_bytes())?;
            sink.flush()?;
        }
        Ok(())
    }
}

/// Locates the first line containing `magic`. Returns the byte offset of the
/// line's start and the line's leading whitespace.
fn find_marker_line(content: &str, magic: &str) -> Option<(usize, String)> {
    let mut line_start: usize = 0;
    for line in content.split_inclusive('\n') {
        if line.contains(magic) {
            let indent: String = line
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect();
            return Some((line_start, indent));
        }
        line_start += line.len();
    }
    None
}

/// Appends UTF-8 text to a newly created output file.
#[derive(Debug)]
pub struct FileWriter<'a> {
    buffer: &'a mut String,
}

impl Write for FileWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let text: &str = std::str::from_utf8(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.buffer.push_str(text);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Buffers UTF-8 text destined for an insertion point; splices on drop.
#[derive(Debug)]
pub struct InsertWriter<'a> {
    buffer: &'a mut String,
    offset: usize,
    indent: String,
    pending: String,
}

impl Write for InsertWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let text: &str = std::str::from_utf8(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pending.push_str(text);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for InsertWriter<'_> {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut block: String = String::with_capacity(self.pending.len() + self.indent.len());
        for line in self.pending.split_inclusive('\n') {
            block.push_str(&self.indent);
            block.push_str(line);
        }
        if !block.ends_with('\n') {
            block.push('\n');
        }
        self.buffer.insert_str(self.offset, &block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::DiskOutputStreamProvider;
    use std::fs;

    fn write_all(mut writer: impl Write, text: &str) {
        writer
            .write_all(text.as_bytes())
            .expect("in-memory write should succeed");
    }

    #[test]
    fn create_file_rejects_duplicates() {
        let mut context = GeneratorContext::new(Vec::new());
        drop(context.create_file("out.txt").expect("first create should succeed"));
        let second = context.create_file("out.txt");
        assert!(matches!(second, Err(CodeGenError::DuplicateFile(name)) if name == "out.txt"));
    }

    #[test]
    fn open_for_insert_requires_existing_file() {
        let mut context = GeneratorContext::new(Vec::new());
        let result = context.open_for_insert("missing.txt", "p");
        assert!(matches!(result, Err(CodeGenError::UnknownFile(name)) if name == "missing.txt"));
    }

    #[test]
    fn open_for_insert_requires_emitted_marker() {
        let mut context = GeneratorContext::new(Vec::new());
        write_all(
            context.create_file("out.txt").expect("create should succeed"),
            "no markers here\n",
        );
        let result = context.open_for_insert("out.txt", "p");
        assert!(
            matches!(result, Err(CodeGenError::UnknownPoint { file, point }) if file == "out.txt" && point == "p")
        );
    }

    #[test]
    fn insertions_land_before_marker_in_request_order() {
        let mut context = GeneratorContext::new(Vec::new());
        write_all(
            context.create_file("out.txt").expect("create should succeed"),
            "head\n// @@schemagen_insertion_point(p) is here\nmiddle\n// @@schemagen_insertion_point(q) is here\ntail\n",
        );

        write_all(
            context.open_for_insert("out.txt", "p").expect("open p should succeed"),
            "first at p\n",
        );
        write_all(
            context.open_for_insert("out.txt", "p").expect("open p should succeed"),
            "second at p\n",
        );
        write_all(
            context.open_for_insert("out.txt", "q").expect("open q should succeed"),
            "only at q\n",
        );

        let expected: &str = "head\n\
                              first at p\n\
                              second at p\n\
                              // @@schemagen_insertion_point(p) is here\n\
                              middle\n\
                              only at q\n\
                              // @@schemagen_insertion_point(q) is here\n\
                              tail\n";
        assert_eq!(
            context.file_content("out.txt").expect("file should exist"),
            expected
        );
    }

    #[test]
    fn inserted_lines_inherit_marker_indentation() {
        let mut context = GeneratorContext::new(Vec::new());
        write_all(
            context.create_file("out.txt").expect("create should succeed"),
            "fn body() {\n    // @@schemagen_insertion_point(body) is here\n}\n",
        );
        write_all(
            context
                .open_for_insert("out.txt", "body")
                .expect("open should succeed"),
            "let a = 1;\nlet b = 2;\n",
        );

        let expected: &str = "fn body() {\n    let a = 1;\n    let b = 2;\n    // @@schemagen_insertion_point(body) is here\n}\n";
        assert_eq!(
            context.file_content("out.txt").expect("file should exist"),
            expected
        );
    }

    #[test]
    fn insertion_without_trailing_newline_gets_one() {
        let mut context = GeneratorContext::new(Vec::new());
        write_all(
            context.create_file("out.txt").expect("create should succeed"),
            "// @@schemagen_insertion_point(p) is here\n",
        );
        write_all(
            context.open_for_insert("out.txt", "p").expect("open should succeed"),
            "no newline",
        );
        assert_eq!(
            context.file_content("out.txt").expect("file should exist"),
            "no newline\n// @@schemagen_insertion_point(p) is here\n"
        );
    }

    #[test]
    fn empty_insertion_leaves_file_untouched() {
        let mut context = GeneratorContext::new(Vec::new());
        write_all(
            context.create_file("out.txt").expect("create should succeed"),
            "// @@schemagen_insertion_point(p) is here\n",
        );
        drop(context.open_for_insert("out.txt", "p").expect("open should succeed"));
        assert_eq!(
            context.file_content("out.txt").expect("file should exist"),
            "// @@schemagen_insertion_point(p) is here\n"
        );
    }

    #[test]
    fn finalize_writes_buffers_and_retains_markers() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let mut provider = DiskOutputStreamProvider::new(dir.path());

        let mut context = GeneratorContext::new(Vec::new());
        write_all(
            context.create_file("gen.txt").expect("create should succeed"),
            "content\n# @@schemagen_insertion_point(late) is here\n",
        );
        context.finalize(&mut provider).expect("finalize should succeed");

        let written: String =
            fs::read_to_string(dir.path().join("gen.txt")).expect("output file should exist");
        assert_eq!(written, "content\n# @@schemagen_insertion_point(late) is here\n");
    }

    #[test]
    fn parsed_files_come_from_descriptor_set() {
        let files: Vec<FileDescriptor> = crate::descriptor::parse_file_set(
            r#"[{ "name": "a.proto" }, { "name": "b.proto" }]"#,
        )
        .expect("descriptor set should parse");
        let context = GeneratorContext::for_files(&files);
        assert_eq!(context.parsed_files(), ["a.proto", "b.proto"]);
    }
}
