/*!
Error taxonomy shared by the substrate and all peripherals.

- `InvalidRegister` / `InvalidOpcode` originate in the executor and are
  surfaced unchanged through `System::step`.
- `User(code)` is a peripheral-defined install/operation failure; the
  substrate treats the code as opaque.
- `CantRestore` is returned by a peripheral asked to restore from a
  snapshot it cannot honour.
- `Io` wraps host I/O failures (disk images and the like).

In-flight accesses to unmapped memory or ports are deliberately *not*
errors: reads return 0xFF and writes are discarded, matching real PC
behaviour.
*/

use thiserror::Error;

/// Crate-wide result alias; `Ok(())` is the "no error" case.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid register access")]
    InvalidRegister,

    #[error("invalid opcode")]
    InvalidOpcode,

    #[error("peripheral error {0}")]
    User(u8),

    #[error("peripheral cannot restore from snapshot")]
    CantRestore,

    #[error("host i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_is_opaque_but_displayable() {
        let e = Error::User(3);
        assert_eq!(e.to_string(), "peripheral error 3");
    }

    #[test]
    fn io_errors_convert() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(Error::Io(_))));
    }
}
