//! Benchmarkable subjects.
//!
//! The harness only needs two things from a subject: build a deterministic
//! input for a size, and run once on that input. Building happens outside the
//! timed region.

use std::fs::File;
use std::io::{BufWriter, Read};

use rand::rngs::StdRng;
use tempfile::NamedTempFile;

use crate::data::{generate_postfix, generate_stack_script};
use crate::domain::SubjectKind;
use crate::error::SubjectError;
use crate::subjects::{ScriptError, StackMachine, evaluate, parse_script, write_script};

/// An operation whose running time is measured as a function of input size.
///
/// Implementations must not keep mutable state between invocations; the
/// harness may call `invoke` from several threads when sweeping sizes in
/// parallel.
pub trait Subject {
    type Input;

    /// Label carried on every sample this subject produces.
    fn label(&self) -> &str;

    /// Build the input for one trial. Called outside the timed region.
    fn generate(&self, size: usize, rng: &mut StdRng) -> Result<Self::Input, SubjectError>;

    /// Run the operation once.
    fn invoke(&self, input: &Self::Input) -> Result<(), SubjectError>;
}

/// Evaluates generated postfix expressions of `size` tokens.
#[derive(Debug, Clone, Default)]
pub struct PostfixSubject;

impl Subject for PostfixSubject {
    type Input = String;

    fn label(&self) -> &str {
        SubjectKind::Postfix.label()
    }

    fn generate(&self, size: usize, rng: &mut StdRng) -> Result<String, SubjectError> {
        Ok(generate_postfix(size, rng))
    }

    fn invoke(&self, input: &String) -> Result<(), SubjectError> {
        std::hint::black_box(evaluate(input)?);
        Ok(())
    }
}

/// A stack script staged in a scratch file owned by one trial.
///
/// The file is removed when this value is dropped, whether the trial succeeded
/// or not.
#[derive(Debug)]
pub struct ScratchScript {
    file: NamedTempFile,
    op_count: usize,
}

impl ScratchScript {
    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

/// Replays generated scripts of `size` stack operations read from a scratch file.
///
/// Each invocation reads the file, parses it into `StackOp`s and executes them
/// against a fresh stack, discarding the transcript.
#[derive(Debug, Clone, Default)]
pub struct StackScriptSubject;

impl Subject for StackScriptSubject {
    type Input = ScratchScript;

    fn label(&self) -> &str {
        SubjectKind::Stack.label()
    }

    fn generate(&self, size: usize, rng: &mut StdRng) -> Result<ScratchScript, SubjectError> {
        let ops = generate_stack_script(size, rng);
        let file = NamedTempFile::new()?;
        write_script(&ops, BufWriter::new(file.as_file()))?;
        Ok(ScratchScript {
            file,
            op_count: ops.len(),
        })
    }

    fn invoke(&self, input: &ScratchScript) -> Result<(), SubjectError> {
        let mut text = String::new();
        File::open(input.path())?.read_to_string(&mut text)?;
        let ops = parse_script(&text)?;
        if ops.len() != input.op_count {
            return Err(ScriptError::LengthMismatch {
                expected: input.op_count,
                actual: ops.len(),
            }
            .into());
        }
        let mut machine = StackMachine::new(std::io::sink());
        machine.run(&ops)?;
        std::hint::black_box(machine.stack().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::trial_rng;

    #[test]
    fn scratch_file_is_removed_on_drop() {
        let subject = StackScriptSubject;
        let input = subject.generate(50, &mut trial_rng(1, 50, 0)).unwrap();
        let path = input.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(input.op_count, 50);
        subject.invoke(&input).unwrap();
        drop(input);
        assert!(!path.exists());
    }

    #[test]
    fn scratch_file_is_removed_when_invocation_fails() {
        let subject = StackScriptSubject;
        let input = subject.generate(10, &mut trial_rng(1, 10, 0)).unwrap();
        std::fs::write(input.path(), "1,5 9").unwrap();
        let path = input.path().to_path_buf();

        let result = subject.invoke(&input);
        assert!(matches!(result, Err(SubjectError::Script(_))));
        drop(input);
        assert!(!path.exists());
    }

    #[test]
    fn truncated_scratch_file_fails_the_trial() {
        let subject = StackScriptSubject;
        let input = subject.generate(10, &mut trial_rng(1, 10, 0)).unwrap();
        std::fs::write(input.path(), "1,5\n2\n").unwrap();
        assert!(matches!(
            subject.invoke(&input),
            Err(SubjectError::Script(ScriptError::LengthMismatch { expected: 10, actual: 2 }))
        ));
    }

    #[test]
    fn postfix_subject_round_trip() {
        let subject = PostfixSubject;
        let input = subject.generate(11, &mut trial_rng(3, 11, 0)).unwrap();
        assert_eq!(input.split_whitespace().count(), 11);
        // Generated small expressions may divide by zero; either outcome is a
        // well-formed result, never a panic.
        let _ = subject.invoke(&input);
        assert_eq!(subject.label(), "Postfix Evaluation");
    }
}
