//! Command picker: the filterable dropdown of the command console.

use crate::config::CommandName;

/// Headless state of the command dropdown.
///
/// The picker holds the full command list, the subset matching the current
/// input, an optional highlighted entry, and whether the dropdown is open.
/// It also remembers the last chosen command so choosing it again is a no-op.
///
/// # Example
///
/// ```
/// use heatpump_console::console::CommandPicker;
///
/// let mut picker = CommandPicker::new(["Ping", "SetTargetTemperature", "SetHotWaterTemperature"]);
/// picker.filter("temp");
/// assert_eq!(picker.visible().len(), 2);
///
/// picker.move_down();
/// let chosen = picker.enter().unwrap();
/// assert_eq!(chosen.as_str(), "SetTargetTemperature");
/// assert!(picker.choose(&chosen));
/// assert!(!picker.choose(&chosen));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandPicker {
    commands: Vec<CommandName>,
    visible: Vec<usize>,
    active: Option<usize>,
    open: bool,
    last_chosen: Option<CommandName>,
}

impl CommandPicker {
    /// Create a picker over a command list.
    pub fn new<I>(commands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CommandName>,
    {
        let mut picker = Self::default();
        picker.set_commands(commands);
        picker
    }

    /// Replace the command list; everything becomes visible again.
    pub fn set_commands<I>(&mut self, commands: I)
    where
        I: IntoIterator,
        I::Item: Into<CommandName>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self.visible = (0..self.commands.len()).collect();
        self.active = None;
    }

    /// All commands, in backend order.
    pub fn commands(&self) -> &[CommandName] {
        &self.commands
    }

    /// Commands matching the last filter.
    pub fn visible(&self) -> Vec<&CommandName> {
        self.visible.iter().map(|&i| &self.commands[i]).collect()
    }

    /// Whether the dropdown is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The highlighted command, if any.
    pub fn active(&self) -> Option<&CommandName> {
        self.active
            .and_then(|a| self.visible.get(a))
            .map(|&i| &self.commands[i])
    }

    /// Open the dropdown and apply the current input (on focus).
    pub fn focus(&mut self, input: &str) {
        self.open = true;
        self.filter(input);
    }

    /// Keep commands containing `input`, ignoring case.
    ///
    /// Clears the highlight. The dropdown is open exactly when something matches.
    pub fn filter(&mut self, input: &str) {
        let needle = input.to_lowercase();
        self.visible = self
            .commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.active = None;
        self.open = !self.visible.is_empty();
    }

    /// Close the dropdown (escape, or a click elsewhere).
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Highlight the next visible command, wrapping to the first.
    pub fn move_down(&mut self) -> Option<&CommandName> {
        let count = self.visible.len();
        if count == 0 {
            return None;
        }
        self.active = Some(self.active.map_or(0, |a| (a + 1) % count));
        self.active()
    }

    /// Highlight the previous visible command, wrapping to the last.
    pub fn move_up(&mut self) -> Option<&CommandName> {
        let count = self.visible.len();
        if count == 0 {
            return None;
        }
        self.active = Some(self.active.map_or(count - 1, |a| (a + count - 1) % count));
        self.active()
    }

    /// Take the highlighted command, or the first visible one, and close.
    pub fn enter(&mut self) -> Option<CommandName> {
        let index = self.active.unwrap_or(0);
        let &command = self.visible.get(index)?;
        self.open = false;
        Some(self.commands[command].clone())
    }

    /// Resolve free text when the input loses focus.
    ///
    /// Returns the command with its canonical casing if the text names one
    /// (ignoring case and surrounding whitespace); `None` means the input
    /// should be reset to empty.
    pub fn commit(&self, input: &str) -> Option<CommandName> {
        let wanted = input.trim().to_lowercase();
        self.commands
            .iter()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .cloned()
    }

    /// Record a choice; returns `false` if it repeats the last one.
    pub fn choose(&mut self, command: &CommandName) -> bool {
        if self.last_chosen.as_ref() == Some(command) {
            return false;
        }
        self.last_chosen = Some(command.clone());
        true
    }

    /// Forget the last choice so the same command can be chosen again.
    pub fn reset_choice(&mut self) {
        self.last_chosen = None;
    }

    /// The last chosen command.
    pub fn last_chosen(&self) -> Option<&CommandName> {
        self.last_chosen.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> CommandPicker {
        CommandPicker::new(["Ping", "SetTargetTemperature", "SetHotWaterTemperature", "Reboot"])
    }

    fn names(picker: &CommandPicker) -> Vec<&str> {
        picker.visible().into_iter().map(CommandName::as_str).collect()
    }

    #[test]
    fn starts_with_everything_visible_and_closed() {
        let picker = picker();
        assert_eq!(picker.visible().len(), 4);
        assert!(!picker.is_open());
        assert!(picker.active().is_none());
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut picker = picker();
        picker.filter("TEMP");
        assert_eq!(names(&picker), vec!["SetTargetTemperature", "SetHotWaterTemperature"]);
        assert!(picker.is_open());
    }

    #[test]
    fn filter_without_matches_closes() {
        let mut picker = picker();
        picker.focus("");
        assert!(picker.is_open());
        picker.filter("defrost");
        assert!(picker.visible().is_empty());
        assert!(!picker.is_open());
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut picker = picker();
        picker.filter("set");
        assert_eq!(picker.move_down().unwrap().as_str(), "SetTargetTemperature");
        assert_eq!(picker.move_down().unwrap().as_str(), "SetHotWaterTemperature");
        assert_eq!(picker.move_down().unwrap().as_str(), "SetTargetTemperature");
        assert_eq!(picker.move_up().unwrap().as_str(), "SetHotWaterTemperature");
    }

    #[test]
    fn move_up_from_nothing_selects_last() {
        let mut picker = picker();
        assert_eq!(picker.move_up().unwrap().as_str(), "Reboot");
    }

    #[test]
    fn navigation_on_empty_list_is_noop() {
        let mut picker = picker();
        picker.filter("zzz");
        assert!(picker.move_down().is_none());
        assert!(picker.move_up().is_none());
        assert!(picker.enter().is_none());
    }

    #[test]
    fn filtering_clears_highlight() {
        let mut picker = picker();
        picker.move_down();
        picker.filter("re");
        assert!(picker.active().is_none());
    }

    #[test]
    fn enter_takes_active_or_first() {
        let mut picker = picker();
        picker.focus("");
        assert_eq!(picker.enter().unwrap().as_str(), "Ping");
        assert!(!picker.is_open());

        picker.focus("");
        picker.move_down();
        picker.move_down();
        assert_eq!(picker.enter().unwrap().as_str(), "SetTargetTemperature");
    }

    #[test]
    fn commit_normalizes_casing() {
        let picker = picker();
        assert_eq!(picker.commit("  ping ").unwrap().as_str(), "Ping");
        assert_eq!(picker.commit("REBOOT").unwrap().as_str(), "Reboot");
        assert!(picker.commit("pin").is_none());
        assert!(picker.commit("").is_none());
    }

    #[test]
    fn repeated_choice_is_ignored_until_reset() {
        let mut picker = picker();
        let ping = CommandName::new("Ping");
        assert!(picker.choose(&ping));
        assert!(!picker.choose(&ping));
        assert!(picker.choose(&CommandName::new("Reboot")));
        assert!(picker.choose(&ping));

        picker.reset_choice();
        assert!(picker.last_chosen().is_none());
        assert!(picker.choose(&ping));
    }

    #[test]
    fn set_commands_resets_list() {
        let mut picker = picker();
        picker.filter("ping");
        picker.set_commands(vec!["A", "B"]);
        assert_eq!(names(&picker), vec!["A", "B"]);
        assert_eq!(picker.commands().len(), 2);
    }
}
