use core::fmt;

/// Why `configure` refused a matrix setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    TooManyColumns,
    NoColumns,
    TooManyRows,
    NoRows,
    MissingRowLines { needed: u8, available: u8 },
    MissingColumnLines { needed: u8, available: u8 },
    ZeroInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TooManyColumns => write!(f, "{} columns max", crate::MAX_COLUMNS),
            ConfigError::NoColumns => f.write_str("at least one column is needed"),
            ConfigError::TooManyRows => write!(f, "{} rows max", crate::MAX_ROWS),
            ConfigError::NoRows => f.write_str("at least one row is needed"),
            ConfigError::MissingRowLines { needed, available } => {
                write!(f, "{needed} row lines needed, {available} given")
            }
            ConfigError::MissingColumnLines { needed, available } => {
                write!(f, "{needed} column lines needed, {available} given")
            }
            ConfigError::ZeroInterval => f.write_str("scan interval can not be zero"),
        }
    }
}

/// Lifecycle of a scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Elements can be added, `configure` has not been called yet
    Setup,
    /// Configured and scanning
    Running,
    /// `configure` failed, nothing will ever be scanned
    Disabled,
}

/// An operation was called in the wrong [`Phase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PreconditionError {
    pub operation: &'static str,
    pub required: Phase,
    pub actual: Phase,
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} needs the scanner in {:?}, it is {:?}",
            self.operation, self.required, self.actual
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    Config(ConfigError),
    Precondition(PreconditionError),
    /// The element registry has no room left
    RegistryFull,
    /// An element reads a position that was never assigned
    UnsetPosition,
    Pin(E),
}

impl<E> From<ConfigError> for Error<E> {
    fn from(error: ConfigError) -> Self {
        Error::Config(error)
    }
}

impl<E> From<PreconditionError> for Error<E> {
    fn from(error: PreconditionError) -> Self {
        Error::Precondition(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(error) => write!(f, "configuration error: {error}"),
            Error::Precondition(error) => write!(f, "precondition violated: {error}"),
            Error::RegistryFull => f.write_str("no room for more switch elements"),
            Error::UnsetPosition => f.write_str("switch element has an unset position"),
            Error::Pin(error) => write!(f, "pin error: {error:?}"),
        }
    }
}
