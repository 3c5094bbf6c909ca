//! The command catalog: name → [`CommandDescriptor`] registry.

use crate::command::MacroCommand;
use crate::commands::{
    Call, KeyDown, KeyPress, KeyPressText, KeyUp, Label, MouseClick, MouseDown, MouseMove,
    MouseUp, MouseWheel, Stop, Wait,
};
use crate::error::CatalogError;
use std::sync::OnceLock;

type Factory = fn() -> Box<dyn MacroCommand>;

/// Inclusive bounds on the number of parameters a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn accepts(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }

    /// Human-readable expectation, e.g. `"2 parameters"` or `"0 to 1 parameters"`.
    pub fn describe(&self) -> String {
        let noun = if self.max == 1 { "parameter" } else { "parameters" };
        if self.min == self.max {
            format!("{} {noun}", self.min)
        } else {
            format!("{} to {} {noun}", self.min, self.max)
        }
    }
}

/// Everything the compiler needs to instantiate a command from a script line.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub arity: Arity,
    /// Short syntax hint for editors and `automate commands`.
    pub usage: &'static str,
    pub factory: Factory,
}

impl CommandDescriptor {
    pub const fn new(
        name: &'static str,
        arity: Arity,
        usage: &'static str,
        factory: Factory,
    ) -> Self {
        Self {
            name,
            arity,
            usage,
            factory,
        }
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Ordered, case-insensitive registry of commands.
///
/// Registration order only affects [`names`](Self::names); it never changes
/// how a script compiles or runs.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: Vec<CommandDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide catalog holding every built-in command.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut catalog = Catalog::new();
            for descriptor in BUILTIN_COMMANDS {
                let registered = catalog.register(descriptor.clone());
                debug_assert!(registered.is_ok(), "duplicate built-in command {}", descriptor.name);
            }
            catalog
        })
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), CatalogError> {
        if self.lookup(descriptor.name).is_ok() {
            return Err(CatalogError::DuplicateCommand(descriptor.name.to_string()));
        }
        self.entries.push(descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor, CatalogError> {
        self.entries
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::UnknownCommand(name.to_string()))
    }

    /// Command names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|d| d.name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static BUILTIN_COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor::new(Call::NAME, Arity::exactly(1), "Call <line|name>", Call::create),
    CommandDescriptor::new(Label::NAME, Arity::exactly(1), "Label <name>", Label::create),
    CommandDescriptor::new(Wait::NAME, Arity::range(1, 2), "Wait <ms> [max ms]", Wait::create),
    CommandDescriptor::new(Stop::NAME, Arity::exactly(0), "Stop", Stop::create),
    CommandDescriptor::new(KeyDown::NAME, Arity::exactly(1), "KeyDown <key>", KeyDown::create),
    CommandDescriptor::new(KeyUp::NAME, Arity::exactly(1), "KeyUp <key>", KeyUp::create),
    CommandDescriptor::new(
        KeyPress::NAME,
        Arity::exactly(1),
        "KeyPress <key|Mod+Key>",
        KeyPress::create,
    ),
    CommandDescriptor::new(
        KeyPressText::NAME,
        Arity::range(1, 2),
        "KeyPressText \"text\" [delay ms]",
        KeyPressText::create,
    ),
    CommandDescriptor::new(
        MouseMove::NAME,
        Arity::exactly(2),
        "MouseMove <x> <y>",
        MouseMove::create,
    ),
    CommandDescriptor::new(
        MouseDown::NAME,
        Arity::range(0, 1),
        "MouseDown [button]",
        MouseDown::create,
    ),
    CommandDescriptor::new(MouseUp::NAME, Arity::range(0, 1), "MouseUp [button]", MouseUp::create),
    CommandDescriptor::new(
        MouseClick::NAME,
        Arity::range(0, 1),
        "MouseClick [button]",
        MouseClick::create,
    ),
    CommandDescriptor::new(
        MouseWheel::NAME,
        Arity::exactly(1),
        "MouseWheel <delta>",
        MouseWheel::create,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.lookup("keypress").unwrap().name, "KeyPress");
        assert_eq!(catalog.lookup("MOUSEMOVE").unwrap().name, "MouseMove");
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(
            Catalog::builtin().lookup("Fly").unwrap_err(),
            CatalogError::UnknownCommand("Fly".to_string())
        );
    }

    #[test]
    fn test_names_keep_registration_order() {
        let names = Catalog::builtin().names();
        assert_eq!(names.len(), BUILTIN_COMMANDS.len());
        assert_eq!(names[0], "Call");
        assert_eq!(names.last(), Some(&"MouseWheel"));
    }

    #[test]
    fn test_builtin_table_names_are_distinct() {
        let mut catalog = Catalog::new();
        for descriptor in BUILTIN_COMMANDS {
            catalog.register(descriptor.clone()).unwrap();
        }
        assert_eq!(catalog.len(), BUILTIN_COMMANDS.len());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut catalog = Catalog::new();
        catalog
            .register(CommandDescriptor::new("Wait", Arity::exactly(1), "", Wait::create))
            .unwrap();
        let err = catalog
            .register(CommandDescriptor::new("WAIT", Arity::exactly(1), "", Wait::create))
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateCommand("WAIT".to_string()));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_arity() {
        assert!(Arity::exactly(2).accepts(2));
        assert!(!Arity::exactly(2).accepts(1));
        assert!(Arity::range(0, 1).accepts(0));
        assert_eq!(Arity::exactly(2).describe(), "2 parameters");
        assert_eq!(Arity::exactly(1).describe(), "1 parameter");
        assert_eq!(Arity::range(1, 2).describe(), "1 to 2 parameters");
    }
}
