//! Conversation state machine - stateful, condition-filtered traversal of a
//! dialogue graph.
//!
//! A [`Conversation`] owns at most one live session at a time. Every
//! state-mutating operation runs to completion, fires the affected nodes'
//! enter/exit actions through the active conversant's bindings, and ends with
//! exactly one synchronous, zero-payload notification to the registered
//! observers. Observers re-read session state through the query accessors.

mod conversant;

pub use conversant::*;

use tracing::{debug, trace};

use crate::error::DialogueError;
use crate::graph::{Dialogue, DialogueNode, NodeId, SpeakerRole};
use crate::triggers::DialogueAction;
use game_facts::PredicateEvaluator;

/// Observable states of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationState {
    /// No session is active.
    Inactive,
    /// A line is on display; the caller continues with
    /// [`Conversation::advance`].
    AwaitingAdvance,
    /// Multiple player options are on display; continuation requires
    /// [`Conversation::select_choice`].
    AwaitingChoice,
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConversationState::Inactive => "inactive",
            ConversationState::AwaitingAdvance => "awaiting advance",
            ConversationState::AwaitingChoice => "awaiting choice",
        };
        write!(f, "{}", name)
    }
}

/// Live session fields; exist only between `start_dialogue` and `quit`.
#[derive(Debug)]
struct Session {
    dialogue: Dialogue,
    conversant: Conversant,
    cursor: NodeId,
    choosing: bool,
    single_choice: bool,
}

/// Drives one participant's side of a conversation.
///
/// Holds the fact providers (in veto-precedence order), the observer list,
/// and the player's display identity between sessions; the graph, the
/// conversant and the traversal cursor live only while a session is active.
pub struct Conversation {
    session: Option<Session>,
    evaluators: Vec<Box<dyn PredicateEvaluator>>,
    observers: Vec<Box<dyn FnMut()>>,
    player_name: String,
    player_mood: Emotion,
}

impl Conversation {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            session: None,
            evaluators: Vec::new(),
            observers: Vec::new(),
            player_name: player_name.into(),
            player_mood: Emotion::Neutral,
        }
    }

    /// Register a fact provider. Registration order is veto-precedence order.
    pub fn add_evaluator(&mut self, evaluator: impl PredicateEvaluator + 'static) {
        self.evaluators.push(Box::new(evaluator));
    }

    /// Register an observer, invoked synchronously at the end of every
    /// state-mutating operation, in registration order.
    pub fn on_updated(&mut self, observer: impl FnMut() + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> ConversationState {
        match &self.session {
            None => ConversationState::Inactive,
            Some(session) if session.choosing => ConversationState::AwaitingChoice,
            Some(_) => ConversationState::AwaitingAdvance,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Begin a session with the given conversant on the given graph.
    ///
    /// The cursor lands on the graph root and the root's enter actions fire.
    /// Fails with [`DialogueError::InvalidState`] while a session is active.
    pub fn start_dialogue(
        &mut self,
        conversant: Conversant,
        dialogue: Dialogue,
    ) -> Result<(), DialogueError> {
        if self.session.is_some() {
            return Err(DialogueError::InvalidState {
                operation: "start_dialogue",
                state: self.state(),
            });
        }

        let cursor = dialogue.root().clone();
        debug!(root = %cursor, conversant = conversant.name(), "dialogue started");
        self.session = Some(Session {
            dialogue,
            conversant,
            cursor,
            choosing: false,
            single_choice: false,
        });
        self.fire_enter_actions();
        self.notify();
        Ok(())
    }

    /// Move the conversation past the current line.
    ///
    /// With exactly one eligible player child, the cursor continues straight
    /// onto it (the player's own line, flagged single-choice). With several,
    /// the conversation holds for [`Conversation::select_choice`] without
    /// moving the cursor. With none, the cursor continues to the first
    /// eligible child of any role, in authoring order.
    ///
    /// Advancing past a terminal line is a call-sequence violation: callers
    /// are expected to consult [`Conversation::has_next`] and quit instead.
    /// It fails with [`DialogueError::InvalidState`], mutating nothing and
    /// notifying no one.
    pub fn advance(&mut self) -> Result<(), DialogueError> {
        let state = self.state();
        if state != ConversationState::AwaitingAdvance {
            return Err(DialogueError::InvalidState {
                operation: "advance",
                state,
            });
        }

        let player_children = self.eligible_children(Some(SpeakerRole::Player));

        if player_children.len() == 1 {
            if let Some(next) = player_children.into_iter().next() {
                debug!(to = %next, "advancing onto the single player line");
                self.step_to(next);
            }
            if let Some(session) = self.session.as_mut() {
                session.single_choice = true;
            }
            self.notify();
            return Ok(());
        }

        if player_children.len() > 1 {
            debug!(options = player_children.len(), "presenting player choices");
            self.fire_exit_actions();
            if let Some(session) = self.session.as_mut() {
                session.choosing = true;
                session.single_choice = false;
            }
            self.notify();
            return Ok(());
        }

        let Some(next) = self.eligible_children(None).into_iter().next() else {
            return Err(DialogueError::InvalidState {
                operation: "advance",
                state,
            });
        };
        debug!(to = %next, "advancing");
        self.step_to(next);
        if let Some(session) = self.session.as_mut() {
            session.single_choice = false;
        }
        self.notify();
        Ok(())
    }

    /// Commit one of the offered player choices.
    ///
    /// Eligibility is re-validated at call time - provider state may have
    /// changed since the choices were offered - and a no-longer-eligible
    /// choice fails with [`DialogueError::StaleChoice`], leaving the cursor
    /// in place. A committed choice fires its enter actions and the
    /// conversation continues past it immediately; its line never demands a
    /// second prompt. If the chosen node is terminal the session stays on it,
    /// awaiting [`Conversation::quit`].
    pub fn select_choice(&mut self, chosen: impl Into<NodeId>) -> Result<(), DialogueError> {
        let state = self.state();
        if state != ConversationState::AwaitingChoice {
            return Err(DialogueError::InvalidState {
                operation: "select_choice",
                state,
            });
        }

        let chosen = chosen.into();
        if !self
            .eligible_children(Some(SpeakerRole::Player))
            .contains(&chosen)
        {
            return Err(DialogueError::StaleChoice { chosen });
        }

        debug!(chosen = %chosen, "choice selected");
        if let Some(session) = self.session.as_mut() {
            session.cursor = chosen;
            session.choosing = false;
        }
        self.fire_enter_actions();

        if self.has_next() {
            self.advance()
        } else {
            // The author made the chosen line terminal; it stays on display
            // as the player's own line.
            if let Some(session) = self.session.as_mut() {
                session.single_choice = true;
            }
            self.notify();
            Ok(())
        }
    }

    /// End the session from any active state, firing the current node's exit
    /// actions and resetting every session field.
    pub fn quit(&mut self) -> Result<(), DialogueError> {
        if self.session.is_none() {
            return Err(DialogueError::InvalidState {
                operation: "quit",
                state: ConversationState::Inactive,
            });
        }

        self.fire_exit_actions();
        self.session = None;
        debug!("dialogue ended");
        self.notify();
        Ok(())
    }

    /// Whether the cursor has at least one condition-eligible child of any
    /// role. False while inactive.
    pub fn has_next(&self) -> bool {
        !self.eligible_children(None).is_empty()
    }

    /// Display text of the current line; empty while inactive.
    pub fn text(&self) -> &str {
        self.cursor_node().map(|node| node.text.as_str()).unwrap_or("")
    }

    pub fn is_choosing(&self) -> bool {
        matches!(&self.session, Some(session) if session.choosing)
    }

    /// Whether the current line is a degenerate branch point - the player's
    /// only eligible response, continued onto without a prompt.
    pub fn is_single_choice(&self) -> bool {
        matches!(&self.session, Some(session) if session.single_choice)
    }

    /// The currently eligible player responses, in authoring order.
    pub fn choices(&self) -> Vec<&DialogueNode> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        self.filter_on_condition(
            session
                .dialogue
                .children_by_role(&session.cursor, SpeakerRole::Player),
        )
    }

    /// Display identity for the standing line: the player while a choice (or
    /// the player's own single choice) is on screen, the conversant
    /// otherwise. Empty while inactive.
    pub fn speaker_name(&self) -> &str {
        match &self.session {
            Some(session) if session.choosing || session.single_choice => &self.player_name,
            Some(session) => session.conversant.name(),
            None => "",
        }
    }

    /// Mood paired with [`Conversation::speaker_name`].
    pub fn speaker_mood(&self) -> Emotion {
        match &self.session {
            Some(session) if session.choosing || session.single_choice => self.player_mood,
            Some(session) => session.conversant.mood(),
            None => Emotion::Neutral,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_mood(&mut self, mood: Emotion) {
        self.player_mood = mood;
    }

    pub fn current_dialogue(&self) -> Option<&Dialogue> {
        self.session.as_ref().map(|session| &session.dialogue)
    }

    pub fn conversant(&self) -> Option<&Conversant> {
        self.session.as_ref().map(|session| &session.conversant)
    }

    fn cursor_node(&self) -> Option<&DialogueNode> {
        let session = self.session.as_ref()?;
        session.dialogue.get(&session.cursor)
    }

    /// Keep only the nodes whose conditions pass against the registered
    /// providers, preserving order.
    fn filter_on_condition<'a>(&self, nodes: Vec<&'a DialogueNode>) -> Vec<&'a DialogueNode> {
        let evaluators: Vec<&dyn PredicateEvaluator> =
            self.evaluators.iter().map(|e| e.as_ref()).collect();
        nodes
            .into_iter()
            .filter(|node| {
                let eligible = node.condition.evaluate(&evaluators);
                if !eligible {
                    trace!(node = %node.id, "branch gated off");
                }
                eligible
            })
            .collect()
    }

    /// Identifiers of the cursor's condition-eligible children, optionally
    /// restricted to one role. Empty while inactive.
    fn eligible_children(&self, role: Option<SpeakerRole>) -> Vec<NodeId> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        let children = match role {
            Some(role) => session.dialogue.children_by_role(&session.cursor, role),
            None => session.dialogue.children(&session.cursor),
        };
        self.filter_on_condition(children)
            .into_iter()
            .map(|node| node.id.clone())
            .collect()
    }

    /// Fire the current node's exit actions, move the cursor, fire the new
    /// node's enter actions.
    fn step_to(&mut self, next: NodeId) {
        self.fire_exit_actions();
        if let Some(session) = self.session.as_mut() {
            session.cursor = next;
        }
        self.fire_enter_actions();
    }

    fn fire_enter_actions(&mut self) {
        let actions = self
            .cursor_node()
            .map(|node| node.on_enter.clone())
            .unwrap_or_default();
        self.fire_actions(&actions);
    }

    fn fire_exit_actions(&mut self) {
        let actions = self
            .cursor_node()
            .map(|node| node.on_exit.clone())
            .unwrap_or_default();
        self.fire_actions(&actions);
    }

    /// Broadcast each non-placeholder symbol through the conversant's
    /// bindings, in authored order.
    fn fire_actions(&mut self, actions: &[DialogueAction]) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for action in actions {
            if *action == DialogueAction::None {
                continue;
            }
            trace!(action = ?action, "dispatching dialogue action");
            session.conversant.triggers_mut().dispatch(*action);
        }
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DialogueNode;
    use game_facts::{Predicate, PredicateEvaluator, PredicateKind, Truth};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Denies `HasItem` queries, silent on everything else.
    struct NoItems;

    impl PredicateEvaluator for NoItems {
        fn evaluate(&self, kind: PredicateKind, _parameters: &[String]) -> Truth {
            match kind {
                PredicateKind::HasItem => Truth::False,
                _ => Truth::Unknown,
            }
        }
    }

    /// Answers `HasItem` from a shared flag, so tests can change provider
    /// state mid-conversation.
    struct ItemFlag(Rc<Cell<bool>>);

    impl PredicateEvaluator for ItemFlag {
        fn evaluate(&self, kind: PredicateKind, _parameters: &[String]) -> Truth {
            match kind {
                PredicateKind::HasItem => Truth::from(self.0.get()),
                _ => Truth::Unknown,
            }
        }
    }

    fn has_key() -> Predicate {
        Predicate::new(PredicateKind::HasItem).with_parameter("key")
    }

    /// root(NPC) -> { a(Player "Yes"), b(Player "No") }, unconditioned.
    fn yes_no_graph() -> Dialogue {
        let root = DialogueNode::new("Will you help?", SpeakerRole::NonPlayer)
            .with_id("root")
            .with_child("a")
            .with_child("b");
        let a = DialogueNode::new("Yes", SpeakerRole::Player).with_id("a");
        let b = DialogueNode::new("No", SpeakerRole::Player).with_id("b");
        Dialogue::new("root", [root, a, b]).unwrap()
    }

    fn conversation() -> Conversation {
        Conversation::new("Wanderer")
    }

    #[test]
    fn test_start_displays_root() {
        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();

        assert!(conversation.is_active());
        assert_eq!(conversation.state(), ConversationState::AwaitingAdvance);
        assert_eq!(conversation.text(), "Will you help?");
        assert_eq!(conversation.speaker_name(), "Elder");
        assert!(conversation.has_next());
    }

    #[test]
    fn test_start_requires_inactive() {
        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();

        let error = conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap_err();
        assert_eq!(
            error,
            DialogueError::InvalidState {
                operation: "start_dialogue",
                state: ConversationState::AwaitingAdvance,
            }
        );
    }

    #[test]
    fn test_two_eligible_player_children_offer_choices() {
        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();
        conversation.advance().unwrap();

        assert_eq!(conversation.state(), ConversationState::AwaitingChoice);
        assert!(conversation.is_choosing());
        // The cursor holds until a choice is made.
        assert_eq!(conversation.text(), "Will you help?");

        let choices: Vec<_> = conversation
            .choices()
            .iter()
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(choices, vec!["a", "b"]);
    }

    #[test]
    fn test_single_eligible_player_child_advances_directly() {
        let root = DialogueNode::new("Will you help?", SpeakerRole::NonPlayer)
            .with_id("root")
            .with_child("a")
            .with_child("b");
        let a = DialogueNode::new("Yes", SpeakerRole::Player).with_id("a");
        let b = DialogueNode::new("No", SpeakerRole::Player)
            .with_id("b")
            .with_condition(has_key());
        let dialogue = Dialogue::new("root", [root, a, b]).unwrap();

        let mut conversation = conversation();
        conversation.add_evaluator(NoItems);
        conversation
            .start_dialogue(Conversant::new("Elder"), dialogue)
            .unwrap();
        conversation.advance().unwrap();

        assert!(!conversation.is_choosing());
        assert!(conversation.is_single_choice());
        assert_eq!(conversation.text(), "Yes");
        assert_eq!(conversation.speaker_name(), "Wanderer");
    }

    #[test]
    fn test_single_player_child_wins_over_earlier_npc_child() {
        // The player's sole line is not first in authoring order; the cursor
        // must still land on it, not on the earlier non-player child.
        let root = DialogueNode::new("Hmm.", SpeakerRole::NonPlayer)
            .with_id("root")
            .with_child("aside")
            .with_child("reply");
        let aside = DialogueNode::new("The elder waits.", SpeakerRole::NonPlayer).with_id("aside");
        let reply = DialogueNode::new("I'm listening.", SpeakerRole::Player).with_id("reply");
        let dialogue = Dialogue::new("root", [root, aside, reply]).unwrap();

        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), dialogue)
            .unwrap();
        conversation.advance().unwrap();

        assert_eq!(conversation.text(), "I'm listening.");
        assert!(conversation.is_single_choice());
    }

    #[test]
    fn test_no_player_children_takes_first_eligible_in_authoring_order() {
        let root = DialogueNode::new("Leave me.", SpeakerRole::NonPlayer)
            .with_id("root")
            .with_child("gated")
            .with_child("sigh");
        let gated = DialogueNode::new("Fine, take it.", SpeakerRole::NonPlayer)
            .with_id("gated")
            .with_condition(has_key());
        let sigh = DialogueNode::new("The elder sighs.", SpeakerRole::NonPlayer).with_id("sigh");
        let dialogue = Dialogue::new("root", [root, gated, sigh]).unwrap();

        let mut conversation = conversation();
        conversation.add_evaluator(NoItems);
        conversation
            .start_dialogue(Conversant::new("Elder"), dialogue)
            .unwrap();
        conversation.advance().unwrap();

        assert_eq!(conversation.text(), "The elder sighs.");
        assert!(!conversation.is_single_choice());
        assert_eq!(conversation.speaker_name(), "Elder");
    }

    #[test]
    fn test_select_choice_continues_past_the_chosen_line() {
        let root = DialogueNode::new("Will you help?", SpeakerRole::NonPlayer)
            .with_id("root")
            .with_child("a")
            .with_child("b");
        let a = DialogueNode::new("Yes", SpeakerRole::Player)
            .with_id("a")
            .with_child("thanks");
        let b = DialogueNode::new("No", SpeakerRole::Player).with_id("b");
        let thanks = DialogueNode::new("Good. Take this.", SpeakerRole::NonPlayer).with_id("thanks");
        let dialogue = Dialogue::new("root", [root, a, b, thanks]).unwrap();

        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), dialogue)
            .unwrap();
        conversation.advance().unwrap();
        conversation.select_choice("a").unwrap();

        // The chosen line never stands; the reply is on display.
        assert_eq!(conversation.text(), "Good. Take this.");
        assert!(!conversation.is_choosing());
        assert_eq!(conversation.state(), ConversationState::AwaitingAdvance);
        assert_eq!(conversation.speaker_name(), "Elder");
    }

    #[test]
    fn test_select_choice_onto_terminal_line_holds_it() {
        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();
        conversation.advance().unwrap();
        conversation.select_choice("b").unwrap();

        assert_eq!(conversation.text(), "No");
        assert_eq!(conversation.state(), ConversationState::AwaitingAdvance);
        assert!(conversation.is_single_choice());
        assert_eq!(conversation.speaker_name(), "Wanderer");
        assert!(!conversation.has_next());
    }

    #[test]
    fn test_stale_choice_is_rejected_and_cursor_holds() {
        let have_key = Rc::new(Cell::new(true));

        let root = DialogueNode::new("Will you help?", SpeakerRole::NonPlayer)
            .with_id("root")
            .with_child("a")
            .with_child("b");
        let a = DialogueNode::new("Yes", SpeakerRole::Player).with_id("a");
        let b = DialogueNode::new("Open it yourself", SpeakerRole::Player)
            .with_id("b")
            .with_condition(has_key());
        let dialogue = Dialogue::new("root", [root, a, b]).unwrap();

        let mut conversation = conversation();
        conversation.add_evaluator(ItemFlag(Rc::clone(&have_key)));
        conversation
            .start_dialogue(Conversant::new("Elder"), dialogue)
            .unwrap();
        conversation.advance().unwrap();
        assert_eq!(conversation.choices().len(), 2);

        // Provider state drifts after the choices were offered.
        have_key.set(false);

        let error = conversation.select_choice("b").unwrap_err();
        assert_eq!(
            error,
            DialogueError::StaleChoice {
                chosen: NodeId::from("b"),
            }
        );
        assert_eq!(conversation.state(), ConversationState::AwaitingChoice);
        assert_eq!(conversation.text(), "Will you help?");

        // The surviving choice still commits.
        conversation.select_choice("a").unwrap();
        assert_eq!(conversation.text(), "Yes");
    }

    #[test]
    fn test_select_choice_requires_choice_state() {
        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();

        let error = conversation.select_choice("a").unwrap_err();
        assert!(matches!(error, DialogueError::InvalidState { .. }));
    }

    #[test]
    fn test_advance_requires_advance_state() {
        let mut conversation = conversation();
        assert!(matches!(
            conversation.advance(),
            Err(DialogueError::InvalidState { .. })
        ));

        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();
        conversation.advance().unwrap();
        // A standing choice prompt only continues through select_choice.
        assert!(matches!(
            conversation.advance(),
            Err(DialogueError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_advance_past_terminal_line_fails_without_side_effects() {
        let root = DialogueNode::new("Goodbye.", SpeakerRole::NonPlayer).with_id("root");
        let dialogue = Dialogue::new("root", [root]).unwrap();

        let updates = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&updates);

        let mut conversation = conversation();
        conversation.on_updated(move || seen.set(seen.get() + 1));
        conversation
            .start_dialogue(Conversant::new("Elder"), dialogue)
            .unwrap();
        assert_eq!(updates.get(), 1);
        assert!(!conversation.has_next());

        let error = conversation.advance().unwrap_err();
        assert_eq!(
            error,
            DialogueError::InvalidState {
                operation: "advance",
                state: ConversationState::AwaitingAdvance,
            }
        );
        // Nothing moved, no notification went out.
        assert_eq!(conversation.text(), "Goodbye.");
        assert_eq!(updates.get(), 1);

        conversation.quit().unwrap();
        assert_eq!(updates.get(), 2);
    }

    #[test]
    fn test_quit_resets_and_allows_restart() {
        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();
        conversation.advance().unwrap();

        conversation.quit().unwrap();
        assert_eq!(conversation.state(), ConversationState::Inactive);
        assert!(!conversation.is_active());
        assert!(!conversation.is_choosing());
        assert_eq!(conversation.text(), "");
        assert_eq!(conversation.speaker_name(), "");
        assert!(!conversation.has_next());

        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();
        assert_eq!(conversation.text(), "Will you help?");
    }

    #[test]
    fn test_quit_requires_active_session() {
        let mut conversation = conversation();
        let error = conversation.quit().unwrap_err();
        assert_eq!(
            error,
            DialogueError::InvalidState {
                operation: "quit",
                state: ConversationState::Inactive,
            }
        );
    }

    #[test]
    fn test_enter_and_exit_actions_fire_through_bindings() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let root = DialogueNode::new("Ah, a customer.", SpeakerRole::NonPlayer)
            .with_id("root")
            .with_on_enter(DialogueAction::PlaySound)
            .with_on_exit(DialogueAction::MoodReset)
            .with_child("wares");
        let wares = DialogueNode::new("The shelves are bare.", SpeakerRole::NonPlayer)
            .with_id("wares")
            .with_on_enter(DialogueAction::None)
            .with_on_enter(DialogueAction::MoodChange);
        let dialogue = Dialogue::new("root", [root, wares]).unwrap();

        let chime = Rc::clone(&log);
        let chime_again = Rc::clone(&log);
        let calm = Rc::clone(&log);
        let scowl = Rc::clone(&log);
        let conversant = Conversant::new("Merchant")
            .with_trigger(DialogueAction::PlaySound, move || {
                chime.borrow_mut().push("chime");
            })
            .with_trigger(DialogueAction::PlaySound, move || {
                chime_again.borrow_mut().push("chime-again");
            })
            .with_trigger(DialogueAction::MoodReset, move || {
                calm.borrow_mut().push("calm");
            })
            .with_trigger(DialogueAction::MoodChange, move || {
                scowl.borrow_mut().push("scowl");
            });

        let mut conversation = conversation();
        conversation.start_dialogue(conversant, dialogue).unwrap();
        // Both bindings for the entered root's sound fire, in order.
        assert_eq!(log.borrow().as_slice(), &["chime", "chime-again"]);

        conversation.advance().unwrap();
        // Root's exit, then the next node's enter; the placeholder is skipped.
        assert_eq!(
            log.borrow().as_slice(),
            &["chime", "chime-again", "calm", "scowl"]
        );
    }

    #[test]
    fn test_every_mutating_operation_notifies_once() {
        let updates = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&updates);

        let root = DialogueNode::new("Will you help?", SpeakerRole::NonPlayer)
            .with_id("root")
            .with_child("a")
            .with_child("b");
        let a = DialogueNode::new("Yes", SpeakerRole::Player)
            .with_id("a")
            .with_child("thanks");
        let b = DialogueNode::new("No", SpeakerRole::Player).with_id("b");
        let thanks = DialogueNode::new("Good.", SpeakerRole::NonPlayer).with_id("thanks");
        let dialogue = Dialogue::new("root", [root, a, b, thanks]).unwrap();

        let mut conversation = conversation();
        conversation.on_updated(move || seen.set(seen.get() + 1));

        conversation
            .start_dialogue(Conversant::new("Elder"), dialogue)
            .unwrap();
        assert_eq!(updates.get(), 1);

        conversation.advance().unwrap();
        assert_eq!(updates.get(), 2);

        // Selection and its follow-on advance are one operation to observers.
        conversation.select_choice("a").unwrap();
        assert_eq!(updates.get(), 3);

        conversation.quit().unwrap();
        assert_eq!(updates.get(), 4);
    }

    #[test]
    fn test_accessors_do_not_disturb_a_standing_prompt() {
        let mut conversation = conversation();
        conversation
            .start_dialogue(Conversant::new("Elder"), yes_no_graph())
            .unwrap();
        conversation.advance().unwrap();

        let before: Vec<_> = conversation
            .choices()
            .iter()
            .map(|node| node.id.clone())
            .collect();
        let _ = conversation.text();
        let _ = conversation.speaker_name();
        let _ = conversation.has_next();

        assert_eq!(conversation.state(), ConversationState::AwaitingChoice);
        let after: Vec<_> = conversation
            .choices()
            .iter()
            .map(|node| node.id.clone())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_speaker_mood_follows_attribution() {
        let mut conversant = Conversant::new("Elder");
        conversant.set_mood(Emotion::Sad);

        let mut conversation = conversation();
        conversation.set_player_mood(Emotion::Happy);
        conversation
            .start_dialogue(conversant, yes_no_graph())
            .unwrap();
        assert_eq!(conversation.speaker_mood(), Emotion::Sad);

        conversation.advance().unwrap();
        // During a choice prompt the player is the speaker.
        assert_eq!(conversation.speaker_mood(), Emotion::Happy);
    }
}
