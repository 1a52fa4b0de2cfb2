//! Artifact descriptors: the data that parameterises the get pipeline.
//!
//! Every artifact type the CLI can list or show is described by one static
//! [`ArtifactDescriptor`]; adding a type means adding a variant and a descriptor,
//! never a new pipeline.

use crate::client::{CliError, CliResult};

/// Artifact types exposed under `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArtifactKind {
    Users,
    LogLevels,
    DataServices,
    MessageStores,
    TransactionCounts,
}

impl ArtifactKind {
    #[cfg(test)]
    pub(crate) const ALL: [Self; 5] = [
        Self::Users,
        Self::LogLevels,
        Self::DataServices,
        Self::MessageStores,
        Self::TransactionCounts,
    ];

    pub(crate) const fn descriptor(self) -> &'static ArtifactDescriptor {
        match self {
            Self::Users => &USERS,
            Self::LogLevels => &LOG_LEVELS,
            Self::DataServices => &DATA_SERVICES,
            Self::MessageStores => &MESSAGE_STORES,
            Self::TransactionCounts => &TRANSACTION_COUNTS,
        }
    }
}

/// How a single artifact is addressed below its collection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// `collection/<name>`
    PathSegment,
    /// `collection?<key>=<name>`
    Query(&'static str),
    /// `collection?<year>=..&<month>=..`
    Period {
        year: &'static str,
        month: &'static str,
    },
}

/// Accepted positional argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arity {
    Exactly(usize),
    AtMost(usize),
    NoneOrPair,
}

impl Arity {
    pub(crate) const fn accepts(self, received: usize) -> bool {
        match self {
            Self::Exactly(expected) => received == expected,
            Self::AtMost(limit) => received <= limit,
            Self::NoneOrPair => received == 0 || received == 2,
        }
    }

    pub(crate) fn violation(self, received: usize) -> String {
        match self {
            Self::Exactly(expected) => {
                format!("accepts {expected} arg(s), received {received}")
            }
            Self::AtMost(limit) => format!("accepts at most {limit} arg(s), received {received}"),
            Self::NoneOrPair => format!("accepts exactly 0 or 2 arg(s), received {received}"),
        }
    }
}

/// Borrow exactly `N` positional arguments or fail with the arity message.
pub(crate) fn exactly<const N: usize>(args: &[String]) -> CliResult<&[String; N]> {
    <&[String; N]>::try_from(args)
        .map_err(|_| CliError::validation(Arity::Exactly(N).violation(args.len())))
}

/// What a get invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    Collection,
    Named(String),
    Period { year: String, month: String },
}

impl Target {
    /// Name shown inside `[ ... ]` in error lines.
    pub(crate) fn display_name(&self) -> Option<String> {
        match self {
            Self::Collection => None,
            Self::Named(name) => Some(name.clone()),
            Self::Period { year, month } => Some(format!("{year} {month}")),
        }
    }
}

/// Static description of one artifact type.
#[derive(Debug)]
pub(crate) struct ArtifactDescriptor {
    /// Collection path below `/management/`.
    pub(crate) resource: &'static str,
    pub(crate) lookup: Lookup,
    pub(crate) arity: Arity,
    /// Noun used in error lines (`Getting Information of <label>`).
    pub(crate) label: &'static str,
    /// Noun used in the empty-list line (`No <title> found`).
    pub(crate) title: &'static str,
    pub(crate) list_format: &'static str,
    pub(crate) detail_format: &'static str,
    /// Template field to column header.
    pub(crate) headers: &'static [(&'static str, &'static str)],
}

impl ArtifactDescriptor {
    /// Interpret positional arguments as a list or show request.
    pub(crate) fn target(&self, names: &[String]) -> CliResult<Target> {
        match (self.arity, names) {
            (arity, []) if arity.accepts(0) => Ok(Target::Collection),
            (Arity::AtMost(1) | Arity::Exactly(1), [name]) => Ok(Target::Named(name.clone())),
            (Arity::NoneOrPair, [year, month]) => Ok(Target::Period {
                year: year.clone(),
                month: month.clone(),
            }),
            (arity, names) => Err(CliError::validation(arity.violation(names.len()))),
        }
    }
}

const NAME_HEADER: &str = "NAME";

pub(crate) static USERS: ArtifactDescriptor = ArtifactDescriptor {
    resource: "users",
    lookup: Lookup::PathSegment,
    arity: Arity::AtMost(1),
    label: "users",
    title: "Users",
    list_format: "table {{.UserId}}",
    detail_format: "detail Name - {{.UserId}}\n\
                    Is Admin - {{.IsAdmin}}\n\
                    Roles :\n\
                    {{range .Roles}}{{.}}\n{{end}}",
    headers: &[("UserId", "USER ID"), ("IsAdmin", "IS ADMIN")],
};

pub(crate) static LOG_LEVELS: ArtifactDescriptor = ArtifactDescriptor {
    resource: "logging",
    lookup: Lookup::Query("loggerName"),
    arity: Arity::Exactly(1),
    label: "logger",
    title: "Loggers",
    list_format: "table {{.LoggerName}}\t{{.LogLevel}}\t{{.ComponentName}}",
    detail_format: "table {{.LoggerName}}\t{{.LogLevel}}\t{{.ComponentName}}",
    headers: &[
        ("LoggerName", NAME_HEADER),
        ("LogLevel", "LOG LEVEL"),
        ("ComponentName", "COMPONENT"),
    ],
};

pub(crate) static DATA_SERVICES: ArtifactDescriptor = ArtifactDescriptor {
    resource: "data-services",
    lookup: Lookup::Query("dataServiceName"),
    arity: Arity::AtMost(1),
    label: "data services",
    title: "Data Services",
    list_format: "table {{.ServiceName}}\t{{.Wsdl11}}\t{{.Wsdl20}}",
    detail_format: "detail Name - {{.ServiceName}}\n\
                    Group Name - {{.ServiceGroupName}}\n\
                    Description - {{.ServiceDescription}}\n\
                    WSDL 1.1 - {{.Wsdl11}}\n\
                    WSDL 2.0 - {{.Wsdl20}}\n\
                    Queries :\n\
                    ID\tNAMESPACE\n\
                    {{range .Queries}}{{.Id}}\t{{.Namespace}}\n{{end}}",
    headers: &[
        ("ServiceName", NAME_HEADER),
        ("Wsdl11", "WSDL 1.1"),
        ("Wsdl20", "WSDL 2.0"),
    ],
};

pub(crate) static MESSAGE_STORES: ArtifactDescriptor = ArtifactDescriptor {
    resource: "message-stores",
    lookup: Lookup::Query("name"),
    arity: Arity::AtMost(1),
    label: "message stores",
    title: "Message Stores",
    list_format: "table {{.Name}}\t{{.Type}}\t{{.Size}}",
    detail_format: "detail Name - {{.Name}}\n\
                    File Name - {{.File}}\n\
                    Container - {{.Container}}\n\
                    Size - {{.Size}}\n\
                    Properties :\n\
                    {{range .Properties}}{{.Name}} = {{.Value}}\n{{end}}",
    headers: &[("Name", NAME_HEADER), ("Type", "TYPE"), ("Size", "SIZE")],
};

pub(crate) static TRANSACTION_COUNTS: ArtifactDescriptor = ArtifactDescriptor {
    resource: "transactions/count",
    lookup: Lookup::Period {
        year: "year",
        month: "month",
    },
    arity: Arity::NoneOrPair,
    label: "transaction counts",
    title: "Transaction Counts",
    list_format: "table {{.Year}}\t{{.Month}}\t{{.TransactionCount}}",
    detail_format: "table {{.Year}}\t{{.Month}}\t{{.TransactionCount}}",
    headers: &[
        ("Year", "YEAR"),
        ("Month", "MONTH"),
        ("TransactionCount", "TRANSACTION COUNT"),
    ],
};
