use std::sync::Arc;

use crate::catalog::{Catalogs, MaterialEntry};
use crate::errors::InputError;
use crate::input::{parse_dimensions, parse_quantity, PanelSize};
use crate::pricing::{price_order, CompletedOrder, Quote};
use crate::session::states::SessionState;

/// What the shell should show next. `choices` is non-empty only for the two
/// closed-choice stages and is rendered as a single-choice menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub choices: Vec<String>,
}

impl Prompt {
    fn open(text: impl Into<String>) -> Self {
        Self { text: text.into(), choices: Vec::new() }
    }

    fn closed(text: impl Into<String>, choices: Vec<String>) -> Self {
        Self { text: text.into(), choices }
    }
}

/// Result of feeding one message into a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The dialogue continues: either the stage advanced and `prompt` asks
    /// for the next field, or the input was rejected (`rejected` set) and
    /// `state` is the unchanged stage with its re-prompt.
    Continue {
        state: SessionState,
        prompt: Prompt,
        rejected: Option<InputError>,
    },
    /// The finishing choice validated; the order was priced and the session
    /// is finished.
    Completed { quote: Quote },
}

/// The linear ordering dialogue: material, size, quantity, finishing.
///
/// The machine is synchronous and side-effect free. It owns no sessions; the
/// caller holds each [`SessionState`] and is responsible for discarding it on
/// completion or cancellation.
pub struct SessionMachine {
    catalogs: Arc<Catalogs>,
}

impl SessionMachine {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self { catalogs }
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Begins a fresh dialogue. Any previous state for the same session is
    /// simply dropped by the caller; nothing carries over.
    pub fn start(&self) -> (SessionState, Prompt) {
        (SessionState::SelectingMaterial, self.material_prompt(None))
    }

    /// Feeds one raw user message into the dialogue at its current stage.
    pub fn step(&self, state: SessionState, input: &str) -> StepOutcome {
        match state {
            SessionState::SelectingMaterial => self.choose_material(input),
            SessionState::EnteringSize { material } => self.enter_size(material, input),
            SessionState::EnteringQuantity { material, size } => {
                self.enter_quantity(material, size, input)
            }
            SessionState::ChoosingFinishing { material, size, quantity } => {
                self.choose_finishing(material, size, quantity, input)
            }
        }
    }

    fn choose_material(&self, input: &str) -> StepOutcome {
        let Some(material) = self.catalogs.materials.find(input.trim()) else {
            let error = InputError::UnknownMaterial(input.trim().to_owned());
            return StepOutcome::Continue {
                state: SessionState::SelectingMaterial,
                prompt: self.material_prompt(Some(&error)),
                rejected: Some(error),
            };
        };

        let material = material.clone();
        let prompt = Prompt::open(format!(
            "Выбран материал: {}\nЦена: {} руб/м²\n\n\
             Введите размеры (ширина x высота) в метрах.\n\
             Например: 2.5x1.8 или 3x2",
            material.label, material.price_per_sqm
        ));
        StepOutcome::Continue {
            state: SessionState::EnteringSize { material },
            prompt,
            rejected: None,
        }
    }

    fn enter_size(&self, material: MaterialEntry, input: &str) -> StepOutcome {
        let size = match parse_dimensions(input) {
            Ok(size) => size,
            Err(error) => {
                return StepOutcome::Continue {
                    state: SessionState::EnteringSize { material },
                    prompt: Prompt::open(error.user_message()),
                    rejected: Some(error),
                };
            }
        };

        let prompt = Prompt::open(format!(
            "Размер: {} x {} м\nПлощадь: {:.2} м²\n\nВведите количество экземпляров:",
            size.width,
            size.height,
            size.area()
        ));
        StepOutcome::Continue {
            state: SessionState::EnteringQuantity { material, size },
            prompt,
            rejected: None,
        }
    }

    fn enter_quantity(&self, material: MaterialEntry, size: PanelSize, input: &str) -> StepOutcome {
        let quantity = match parse_quantity(input) {
            Ok(quantity) => quantity,
            Err(error) => {
                return StepOutcome::Continue {
                    state: SessionState::EnteringQuantity { material, size },
                    prompt: Prompt::open(error.user_message()),
                    rejected: Some(error),
                };
            }
        };

        let prompt = Prompt::closed(
            format!("Количество: {quantity} шт.\n\nВыберите дополнительные услуги:"),
            self.catalogs.finishing.labels(),
        );
        StepOutcome::Continue {
            state: SessionState::ChoosingFinishing { material, size, quantity },
            prompt,
            rejected: None,
        }
    }

    fn choose_finishing(
        &self,
        material: MaterialEntry,
        size: PanelSize,
        quantity: u32,
        input: &str,
    ) -> StepOutcome {
        let Some(finishing) = self.catalogs.finishing.find(input.trim()) else {
            let error = InputError::UnknownFinishing(input.trim().to_owned());
            let prompt =
                Prompt::closed(error.user_message(), self.catalogs.finishing.labels());
            return StepOutcome::Continue {
                state: SessionState::ChoosingFinishing { material, size, quantity },
                prompt,
                rejected: Some(error),
            };
        };

        let order = CompletedOrder { material, size, quantity, finishing: finishing.clone() };
        StepOutcome::Completed { quote: price_order(&order) }
    }

    fn material_prompt(&self, rejection: Option<&InputError>) -> Prompt {
        let text = match rejection {
            Some(error) => error.user_message().to_owned(),
            None => "Я помогу рассчитать стоимость широкоформатной печати.\n\n\
                     Выберите материал для печати:"
                .to_owned(),
        };
        Prompt::closed(text, self.catalogs.materials.labels())
    }
}
