//! The verification harness: a reference generator whose output is a
//! deterministic, string-comparable encoding.
//!
//! It doubles as the executable specification of the insertion protocol and
//! as a fault-injection source for driver-robustness testing. Every content
//! line encodes `(generator, parameter, source file, first message name,
//! parsed file list)`, so correctness can be checked by exact string equality
//! instead of semantic parsing.

use crate::context::GeneratorContext;
use crate::descriptor::FileDescriptor;
use crate::error::CodeGenError;
use crate::generator::CodeGenerator;
use std::io::Write;
use std::path::Path;

/// Name of the first insertion point every mock-generated file carries.
pub const FIRST_INSERTION_POINT_NAME: &str = "first_mock_insertion_point";
/// Name of the second insertion point every mock-generated file carries.
pub const SECOND_INSERTION_POINT_NAME: &str = "second_mock_insertion_point";

const FIRST_INSERTION_POINT: &str =
    "# @@schemagen_insertion_point(first_mock_insertion_point) is here\n";
const SECOND_INSERTION_POINT: &str =
    "  # @@schemagen_insertion_point(second_mock_insertion_point) is here\n";

/// Top-level message names with this prefix trigger fault injection.
const COMMAND_PREFIX: &str = "MockCodeGenerator_";

/// Exit status a driver is expected to use when honoring an `Exit` fault.
pub const EXIT_FAULT_STATUS: i32 = 123;

/// Reference generator with fully deterministic output.
#[derive(Debug)]
pub struct MockCodeGenerator {
    name: String,
}

impl MockCodeGenerator {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The output file name a mock generator of `generator_name` produces for
    /// schema file `file`.
    #[must_use]
    pub fn output_file_name(generator_name: &str, file: &str) -> String {
        format!("{file}.MockCodeGenerator.{generator_name}")
    }

    /// The deterministic one-line encoding written as file or insertion
    /// content.
    #[must_use]
    pub fn output_file_content(
        generator_name: &str,
        parameter: &str,
        file: &str,
        first_message_name: &str,
        parsed_file_list: &str,
    ) -> String {
        format!("{generator_name}: {parameter}, {file}, {first_message_name}, {parsed_file_list}\n")
    }

    fn content_for(
        &self,
        parameter: &str,
        file: &FileDescriptor,
        context: &GeneratorContext,
    ) -> String {
        let first_message_name: &str = file
            .message_types
            .first()
            .map_or("(none)", |message| message.name.as_str());
        Self::output_file_content(
            &self.name,
            parameter,
            &file.name,
            first_message_name,
            &context.parsed_files().join(","),
        )
    }

    fn check_commands(file: &FileDescriptor) -> Result<(), CodeGenError> {
        for message in &file.message_types {
            let Some(command) = message.name.strip_prefix(COMMAND_PREFIX) else {
                continue;
            };
            return match command {
                "Error" => Err(CodeGenError::GenericError(
                    "Saw message type MockCodeGenerator_Error.".to_string(),
                )),
                "Exit" => Err(CodeGenError::FaultExit {
                    status: EXIT_FAULT_STATUS,
                    message: "Saw message type MockCodeGenerator_Exit.".to_string(),
                }),
                "Abort" => Err(CodeGenError::FaultAbort {
                    message: "Saw message type MockCodeGenerator_Abort.".to_string(),
                }),
                other => Err(CodeGenError::GenericError(format!(
                    "Unknown MockCodeGenerator command: {other}"
                ))),
            };
        }
        Ok(())
    }

    /// Asserts that an emitted artifact matches the deterministic encoding:
    /// the creator's content line, each listed generator's insertions in
    /// order at both points, both marker lines retained, and the second
    /// point's insertions indented like its marker.
    ///
    /// # Panics
    ///
    /// Panics (test-assertion style) when the artifact cannot be read or any
    /// line deviates from the expected encoding.
    pub fn expect_generated(
        name: &str,
        parameter: &str,
        insertions: &str,
        file: &str,
        first_message_name: &str,
        first_parsed_file_name: &str,
        output_directory: &Path,
    ) {
        let path = output_directory.join(Self::output_file_name(name, file));
        let content: String = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));

        let mut lines: Vec<&str> = content.lines().collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let insertion_list: Vec<&str> = if insertions.is_empty() {
            Vec::new()
        } else {
            insertions.split(',').collect()
        };

        assert_eq!(lines.len(), 3 + insertion_list.len() * 2);
        assert_eq!(
            lines[0],
            Self::output_file_content(
                name,
                parameter,
                file,
                first_message_name,
                first_parsed_file_name
            )
            .trim_end_matches('\n')
        );

        assert_eq!(
            lines[1 + insertion_list.len()],
            FIRST_INSERTION_POINT.trim_end_matches('\n')
        );
        assert_eq!(
            lines[2 + insertion_list.len() * 2],
            SECOND_INSERTION_POINT.trim_end_matches('\n')
        );

        for (i, inserter) in insertion_list.iter().enumerate() {
            assert_eq!(
                lines[1 + i],
                Self::output_file_content(inserter, "first_insert", file, first_message_name, file)
                    .trim_end_matches('\n')
            );
            // The second insertion point is indented, so the inserted text
            // must be indented too.
            assert_eq!(
                lines[2 + insertion_list.len() + i],
                format!(
                    "  {}",
                    Self::output_file_content(
                        inserter,
                        "second_insert",
                        file,
                        first_message_name,
                        file
                    )
                )
                .trim_end_matches('\n')
            );
        }
    }
}

fn write_error() -> CodeGenError {
    CodeGenError::GenericError("MockCodeGenerator detected write error.".to_string())
}

impl CodeGenerator for MockCodeGenerator {
    fn generate(
        &self,
        file: &FileDescriptor,
        parameter: &str,
        context: &mut GeneratorContext,
    ) -> Result<(), CodeGenError> {
        Self::check_commands(file)?;

        if let Some(targets) = parameter.strip_prefix("insert=") {
            for target in targets.split(',') {
                let target_file: String = Self::output_file_name(target, &file.name);

                let first_content: String = self.content_for("first_insert", file, context);
                context
                    .open_for_insert(&target_file, FIRST_INSERTION_POINT_NAME)?
                    .write_all(first_content.as_bytes())
                    .map_err(|_| write_error())?;

                let second_content: String = self.content_for("second_insert", file, context);
                context
                    .open_for_insert(&target_file, SECOND_INSERTION_POINT_NAME)?
                    .write_all(second_content.as_bytes())
                    .map_err(|_| write_error())?;
            }
        } else {
            let content: String = self.content_for(parameter, file, context);
            let mut writer = context.create_file(&Self::output_file_name(&self.name, &file.name))?;
            writer.write_all(content.as_bytes()).map_err(|_| write_error())?;
            writer
                .write_all(FIRST_INSERTION_POINT.as_bytes())
                .map_err(|_| write_error())?;
            writer
                .write_all(SECOND_INSERTION_POINT.as_bytes())
                .map_err(|_| write_error())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MessageDescriptor;
    use crate::output::DiskOutputStreamProvider;

    fn schema_file(name: &str, message_names: &[&str]) -> FileDescriptor {
        FileDescriptor {
            name: name.to_string(),
            package: String::new(),
            message_types: message_names
                .iter()
                .map(|message_name| MessageDescriptor {
                    name: (*message_name).to_string(),
                    full_name: (*message_name).to_string(),
                    package: String::new(),
                    fields: Vec::new(),
                    nested_types: Vec::new(),
                    enum_types: Vec::new(),
                })
                .collect(),
            enum_types: Vec::new(),
        }
    }

    #[test]
    fn normal_mode_writes_content_line_and_both_markers() {
        let file: FileDescriptor = schema_file("foo.proto", &["Foo", "Bar"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string(), "bar.proto".to_string()]);

        let generator = MockCodeGenerator::new("test_generator");
        generator
            .generate(&file, "test_parameter", &mut context)
            .expect("generate should succeed");

        let expected: &str = "test_generator: test_parameter, foo.proto, Foo, foo.proto,bar.proto\n\
                              # @@schemagen_insertion_point(first_mock_insertion_point) is here\n\
                              \x20 # @@schemagen_insertion_point(second_mock_insertion_point) is here\n";
        assert_eq!(
            context
                .file_content("foo.proto.MockCodeGenerator.test_generator")
                .expect("output file should exist"),
            expected
        );
    }

    #[test]
    fn file_without_messages_uses_placeholder() {
        let file: FileDescriptor = schema_file("empty.proto", &[]);
        let mut context = GeneratorContext::new(vec!["empty.proto".to_string()]);

        MockCodeGenerator::new("gen")
            .generate(&file, "", &mut context)
            .expect("generate should succeed");

        let content: &str = context
            .file_content("empty.proto.MockCodeGenerator.gen")
            .expect("output file should exist");
        assert!(content.starts_with("gen: , empty.proto, (none), empty.proto\n"));
    }

    #[test]
    fn creating_the_same_output_twice_is_a_duplicate_file_error() {
        let file: FileDescriptor = schema_file("foo.proto", &["Foo"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string()]);

        let generator = MockCodeGenerator::new("gen");
        generator.generate(&file, "", &mut context).expect("first run should succeed");
        let second = generator.generate(&file, "", &mut context);
        assert!(matches!(second, Err(CodeGenError::DuplicateFile(_))));
    }

    #[test]
    fn insert_mode_requires_an_existing_target() {
        let file: FileDescriptor = schema_file("foo.proto", &["Foo"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string()]);

        let result = MockCodeGenerator::new("gen").generate(&file, "insert=absent", &mut context);
        assert!(matches!(result, Err(CodeGenError::UnknownFile(_))));
    }

    #[test]
    fn error_command_returns_plain_failure() {
        let file: FileDescriptor = schema_file("foo.proto", &["MockCodeGenerator_Error"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string()]);

        let result = MockCodeGenerator::new("gen").generate(&file, "", &mut context);
        assert!(
            matches!(result, Err(CodeGenError::GenericError(message)) if message == "Saw message type MockCodeGenerator_Error.")
        );
    }

    #[test]
    fn exit_command_signals_fault_exit_with_fixed_status() {
        let file: FileDescriptor = schema_file("foo.proto", &["MockCodeGenerator_Exit"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string()]);

        let result = MockCodeGenerator::new("gen").generate(&file, "", &mut context);
        assert!(matches!(result, Err(CodeGenError::FaultExit { status: 123, .. })));
    }

    #[test]
    fn abort_command_signals_fault_abort_without_writing() {
        let file: FileDescriptor = schema_file("foo.proto", &["MockCodeGenerator_Abort"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string()]);

        let result = MockCodeGenerator::new("gen").generate(&file, "", &mut context);
        assert!(matches!(result, Err(CodeGenError::FaultAbort { .. })));
        assert!(context.into_files().is_empty());
    }

    #[test]
    fn unknown_command_is_an_error() {
        let file: FileDescriptor = schema_file("foo.proto", &["MockCodeGenerator_Dance"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string()]);

        let result = MockCodeGenerator::new("gen").generate(&file, "", &mut context);
        assert!(
            matches!(result, Err(CodeGenError::GenericError(message)) if message == "Unknown MockCodeGenerator command: Dance")
        );
    }

    #[test]
    fn insertions_from_two_generators_land_in_invocation_order() {
        let file: FileDescriptor = schema_file("foo.proto", &["Foo"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string()]);

        MockCodeGenerator::new("test_plugin")
            .generate(&file, "", &mut context)
            .expect("creator should succeed");
        MockCodeGenerator::new("alpha")
            .generate(&file, "insert=test_plugin", &mut context)
            .expect("first inserter should succeed");
        MockCodeGenerator::new("beta")
            .generate(&file, "insert=test_plugin", &mut context)
            .expect("second inserter should succeed");

        let dir = tempfile::tempdir().expect("tempdir should be created");
        let mut provider = DiskOutputStreamProvider::new(dir.path());
        context.finalize(&mut provider).expect("finalize should succeed");

        MockCodeGenerator::expect_generated(
            "test_plugin",
            "",
            "alpha,beta",
            "foo.proto",
            "Foo",
            "foo.proto",
            dir.path(),
        );
    }

    #[test]
    fn one_generator_can_insert_into_multiple_targets() {
        let file: FileDescriptor = schema_file("foo.proto", &["Foo"]);
        let mut context = GeneratorContext::new(vec!["foo.proto".to_string()]);

        MockCodeGenerator::new("one")
            .generate(&file, "", &mut context)
            .expect("creator one should succeed");
        MockCodeGenerator::new("two")
            .generate(&file, "", &mut context)
            .expect("creator two should succeed");
        MockCodeGenerator::new("patch")
            .generate(&file, "insert=one,two", &mut context)
            .expect("inserter should succeed");

        let dir = tempfile::tempdir().expect("tempdir should be created");
        let mut provider = DiskOutputStreamProvider::new(dir.path());
        context.finalize(&mut provider).expect("finalize should succeed");

        MockCodeGenerator::expect_generated(
            "one", "", "patch", "foo.proto", "Foo", "foo.proto", dir.path(),
        );
        MockCodeGenerator::expect_generated(
            "two", "", "patch", "foo.proto", "Foo", "foo.proto", dir.path(),
        );
    }
}
