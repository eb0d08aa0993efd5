//! Story library and its builder.

use crate::definition::{MatcherDefinition, StepDefinition, StoryDefinition, StoryFile};
use crate::expression::{ExpressionEvaluator, ExpressionFunction, FunctionRegistry};
use crate::matcher::{ExpressionMatcher, IntentMatcher};
use crate::step::Step;
use crate::story::Story;
use responsio_error::{StoryError, StoryErrorKind};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered, immutable set of stories.
///
/// Order matters: when two stories reach the same depth with the same score,
/// the one registered first is selected.
#[derive(Debug, Clone)]
pub struct StoryLibrary {
    stories: Vec<Story>,
}

impl StoryLibrary {
    /// Starts building a library.
    pub fn builder() -> StoryLibraryBuilder {
        StoryLibraryBuilder::new()
    }

    /// Stories in registration order.
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Looks up a story by name.
    pub fn get(&self, name: &str) -> Option<&Story> {
        self.stories.iter().find(|story| story.name() == name)
    }

    /// Number of stories.
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Iterates stories in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Story> {
        self.stories.iter()
    }
}

enum PendingStory {
    Built(Story),
    Defined(StoryDefinition),
}

/// Builds a [`StoryLibrary`] from prebuilt stories and definitions.
///
/// Expression evaluators and extension functions are registered here, and
/// every configuration problem is reported by [`build`](Self::build) before
/// any matching can happen.
///
/// # Examples
///
/// ```
/// use responsio_story::{StepDefinition, StoryDefinition, StoryLibrary};
///
/// let library = StoryLibrary::builder()
///     .definition(StoryDefinition::new(
///         "greet",
///         vec![StepDefinition::intent("greet", Some("utter_greet"))],
///     ))
///     .build()
///     .expect("valid library");
/// assert_eq!(library.len(), 1);
/// ```
pub struct StoryLibraryBuilder {
    evaluator: Option<Arc<dyn ExpressionEvaluator>>,
    functions: FunctionRegistry,
    pending: Vec<PendingStory>,
}

impl Default for StoryLibraryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryLibraryBuilder {
    /// Creates a builder with the built-in expression functions registered.
    pub fn new() -> Self {
        Self {
            evaluator: None,
            functions: FunctionRegistry::with_builtins(),
            pending: Vec::new(),
        }
    }

    /// Sets the evaluator used to compile expression matchers.
    pub fn expression_evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Registers an extension function for matcher expressions.
    pub fn function(mut self, name: impl Into<String>, function: ExpressionFunction) -> Self {
        self.functions.register(name, function);
        self
    }

    /// Adds a prebuilt story.
    pub fn story(mut self, story: Story) -> Self {
        self.pending.push(PendingStory::Built(story));
        self
    }

    /// Adds a story definition.
    pub fn definition(mut self, definition: StoryDefinition) -> Self {
        self.pending.push(PendingStory::Defined(definition));
        self
    }

    /// Adds several story definitions in order.
    pub fn definitions(mut self, definitions: impl IntoIterator<Item = StoryDefinition>) -> Self {
        self.pending
            .extend(definitions.into_iter().map(PendingStory::Defined));
        self
    }

    /// Adds the stories of a TOML story file.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a valid story file.
    pub fn toml_str(self, content: &str) -> Result<Self, StoryError> {
        let file: StoryFile = toml::from_str(content)
            .map_err(|e| StoryError::new(StoryErrorKind::TomlParse(e.to_string())))?;
        Ok(self.definitions(file.stories))
    }

    /// Adds the stories of a TOML story file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn toml_file(self, path: impl AsRef<Path>) -> Result<Self, StoryError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StoryError::new(StoryErrorKind::FileRead(e.to_string())))?;
        self.toml_str(&content)
    }

    /// Compiles and validates every story.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found: a duplicate name, an
    /// empty library, a malformed step graph (including an empty any-of
    /// matcher), a leaf without a matcher, or an expression that cannot be
    /// compiled.
    #[instrument(skip_all, fields(pending = self.pending.len()))]
    pub fn build(self) -> Result<StoryLibrary, StoryError> {
        if self.pending.is_empty() {
            return Err(StoryError::new(StoryErrorKind::EmptyLibrary));
        }

        let compiler = StepCompiler {
            evaluator: self.evaluator.as_deref(),
            functions: &self.functions,
        };

        let mut names = HashSet::new();
        let mut stories = Vec::with_capacity(self.pending.len());
        for pending in self.pending {
            let story = match pending {
                PendingStory::Built(story) => story,
                PendingStory::Defined(definition) => compiler.compile_story(&definition)?,
            };

            if !names.insert(story.name().clone()) {
                return Err(StoryError::new(StoryErrorKind::DuplicateStory(
                    story.name().clone(),
                )));
            }
            check_story(&story)?;

            debug!(story = %story.name(), steps = story.steps().len(), "Registered story");
            stories.push(story);
        }

        info!(stories = stories.len(), "Story library built");
        Ok(StoryLibrary { stories })
    }
}

struct StepCompiler<'a> {
    evaluator: Option<&'a dyn ExpressionEvaluator>,
    functions: &'a FunctionRegistry,
}

impl StepCompiler<'_> {
    fn compile_story(&self, definition: &StoryDefinition) -> Result<Story, StoryError> {
        let steps = definition
            .steps()
            .iter()
            .map(|step| self.compile_step(definition.name(), step))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Story::new(definition.name().clone(), steps)
            .with_completion_penalty(*definition.completion_penalty()))
    }

    fn compile_step(&self, story: &str, definition: &StepDefinition) -> Result<Step, StoryError> {
        let step = match definition {
            StepDefinition::Leaf { weight, action, .. } => {
                let matcher = definition.leaf_matcher().ok_or_else(|| {
                    StoryError::new(StoryErrorKind::MissingMatcher {
                        story: story.to_string(),
                    })
                })?;
                Step::leaf(self.compile_matcher(&matcher)?, *weight, action.clone())
            }
            StepDefinition::Sequence { steps } => Step::sequence(self.compile_steps(story, steps)?),
            StepDefinition::Optional { step } => Step::optional(self.compile_step(story, step)?),
            StepDefinition::Alternation { steps } => {
                Step::alternation(self.compile_steps(story, steps)?)
            }
            StepDefinition::Repeat { step, min, max } => {
                Step::repeat(self.compile_step(story, step)?, *min, *max)
            }
        };
        Ok(step)
    }

    fn compile_steps(
        &self,
        story: &str,
        steps: &[StepDefinition],
    ) -> Result<Vec<Step>, StoryError> {
        steps
            .iter()
            .map(|step| self.compile_step(story, step))
            .collect()
    }

    fn compile_matcher(&self, definition: &MatcherDefinition) -> Result<IntentMatcher, StoryError> {
        match definition {
            MatcherDefinition::Name { intent } => Ok(IntentMatcher::name(intent.clone())),
            MatcherDefinition::Expression { expression } => {
                let evaluator = self.evaluator.ok_or_else(|| {
                    StoryError::new(StoryErrorKind::NoExpressionEvaluator(expression.clone()))
                })?;
                let compiled = evaluator.compile(expression, self.functions).map_err(|e| {
                    StoryError::new(StoryErrorKind::ExpressionCompile {
                        expression: expression.clone(),
                        message: e.message,
                    })
                })?;
                debug!(expression = %expression, "Compiled intent matcher expression");
                Ok(IntentMatcher::Expression(ExpressionMatcher::new(
                    expression.clone(),
                    compiled,
                )))
            }
            MatcherDefinition::AnyOf { matchers } => matchers
                .iter()
                .map(|matcher| self.compile_matcher(matcher))
                .collect::<Result<Vec<_>, _>>()
                .map(IntentMatcher::AnyOf),
        }
    }
}

/// Structural checks shared by built and defined stories.
fn check_story(story: &Story) -> Result<(), StoryError> {
    let name = story.name();
    if story.steps().is_empty() {
        return Err(StoryError::new(StoryErrorKind::EmptyStory(name.clone())));
    }

    let mut problem = None;
    story.root().walk(&mut |step| {
        if problem.is_some() {
            return;
        }
        problem = match step {
            Step::Sequence(steps) if steps.is_empty() => {
                Some(StoryErrorKind::EmptySequence(name.clone()))
            }
            Step::Alternation(steps) if steps.is_empty() => {
                Some(StoryErrorKind::EmptyAlternation(name.clone()))
            }
            Step::Leaf(leaf) if leaf.matcher().has_empty_any_of() => {
                Some(StoryErrorKind::EmptyAnyOf(name.clone()))
            }
            Step::Repeat(repeat) if repeat.min() > repeat.max() => {
                Some(StoryErrorKind::InvalidRepeat {
                    story: name.clone(),
                    min: *repeat.min(),
                    max: *repeat.max(),
                })
            }
            _ => None,
        };
    });

    match problem {
        Some(kind) => Err(StoryError::new(kind)),
        None => Ok(()),
    }
}
