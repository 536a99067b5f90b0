//! Trivia revival
//!
//! The first death of a game opens a question. A correct answer, once its
//! result countdown runs out, revives the snake at half length on a cleared
//! board; a wrong answer makes the death final. One attempt per game.

use serde::{Deserialize, Serialize};

use super::food::generate_food;
use super::grid::Direction;
use super::phantom::PhantomState;
use super::police::PoliceState;
use super::rival::RivalState;
use super::rng::GameRng;
use super::state::{GameEvent, GameState};
use crate::consts::TRIVIA_RESULT_TICKS;

pub struct TriviaQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub answer: usize,
}

pub const TRIVIA_QUESTIONS: &[TriviaQuestion] = &[
    TriviaQuestion {
        prompt: "Which snake is the longest venomous snake in the world?",
        options: ["Black mamba", "King cobra", "Taipan", "Gaboon viper"],
        answer: 1,
    },
    TriviaQuestion {
        prompt: "What do snakes use to smell?",
        options: ["Nostrils only", "Their scales", "Their tongue", "Their eyes"],
        answer: 2,
    },
    TriviaQuestion {
        prompt: "In which year did the game Snake ship on Nokia phones?",
        options: ["1989", "1997", "2003", "2008"],
        answer: 1,
    },
    TriviaQuestion {
        prompt: "Which continent has no native snakes?",
        options: ["Australia", "Africa", "Antarctica", "South America"],
        answer: 2,
    },
    TriviaQuestion {
        prompt: "How many cells does a 20 by 20 grid have?",
        options: ["40", "200", "400", "2000"],
        answer: 2,
    },
    TriviaQuestion {
        prompt: "What is a group of snakes called?",
        options: ["A pride", "A bed", "A flock", "A school"],
        answer: 1,
    },
    TriviaQuestion {
        prompt: "Which snake has the most potent venom?",
        options: ["Inland taipan", "Rattlesnake", "Corn snake", "Python"],
        answer: 0,
    },
    TriviaQuestion {
        prompt: "How do snakes grow?",
        options: ["They never grow", "By shedding skin", "By molting feathers", "By splitting"],
        answer: 1,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriviaResult {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriviaPhase {
    #[default]
    Inactive,
    /// Question on screen, waiting for an answer
    Active { question: usize },
    /// Result on screen; resolves when the timer hits zero
    Answered {
        question: usize,
        result: TriviaResult,
        result_timer: u32,
    },
    Resolved { revived: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriviaState {
    pub phase: TriviaPhase,
    /// Set when the question opens; at most one revival per game
    pub used: bool,
}

impl TriviaState {
    /// Open a question if this game has not had one yet
    pub fn activate(&self, rng: &mut dyn GameRng) -> Self {
        if self.used || self.phase != TriviaPhase::Inactive {
            return *self;
        }
        let question = rng.next_index(TRIVIA_QUESTIONS.len());
        Self {
            phase: TriviaPhase::Active { question },
            used: true,
        }
    }

    /// Close the trivia without asking (revival disabled)
    pub fn decline(&self) -> Self {
        Self {
            phase: TriviaPhase::Resolved { revived: false },
            used: true,
        }
    }

    pub fn question(&self) -> Option<&'static TriviaQuestion> {
        match self.phase {
            TriviaPhase::Active { question } | TriviaPhase::Answered { question, .. } => {
                TRIVIA_QUESTIONS.get(question)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, TriviaPhase::Active { .. } | TriviaPhase::Answered { .. })
    }
}

/// Record an answer. Ignored unless a question is waiting.
pub fn submit_trivia_answer(state: &GameState, index: usize) -> GameState {
    let TriviaPhase::Active { question } = state.trivia.phase else {
        return state.clone();
    };
    let correct = TRIVIA_QUESTIONS.get(question).is_some_and(|q| q.answer == index);
    let result = if correct {
        TriviaResult::Correct
    } else {
        TriviaResult::Wrong
    };
    log::info!("Trivia answered: {:?}", result);

    let mut next = state.clone();
    next.trivia.phase = TriviaPhase::Answered {
        question,
        result,
        result_timer: TRIVIA_RESULT_TICKS,
    };
    next
}

/// Count the result display down; on zero, revive or finalize
pub fn advance_trivia(state: &GameState, rng: &mut dyn GameRng) -> GameState {
    let TriviaPhase::Answered {
        question,
        result,
        result_timer,
    } = state.trivia.phase
    else {
        return state.clone();
    };

    if result_timer > 1 {
        let mut next = state.clone();
        next.trivia.phase = TriviaPhase::Answered {
            question,
            result,
            result_timer: result_timer - 1,
        };
        return next;
    }

    match result {
        TriviaResult::Correct => revive_snake(state, rng),
        TriviaResult::Wrong => {
            let mut next = state.clone();
            next.trivia.phase = TriviaPhase::Resolved { revived: false };
            next
        }
    }
}

/// Bring a dead snake back at half length on a cleared board
pub fn revive_snake(state: &GameState, rng: &mut dyn GameRng) -> GameState {
    let keep = (state.snake.len() / 2).max(1);
    let snake: Vec<_> = state.snake.iter().copied().take(keep).collect();
    let food = generate_food(&snake, &[], rng);
    let direction = safe_heading(&snake, state.direction);
    log::info!("Snake revived at length {}", snake.len());

    GameState {
        snake,
        food,
        direction,
        game_over: false,
        power_up: None,
        active_power_ups: Vec::new(),
        bonus_food: None,
        flag_food: None,
        fake_foods: Vec::new(),
        cash_items: Vec::new(),
        obstacles: Vec::new(),
        phantom: PhantomState {
            body: Default::default(),
            ..state.phantom.clone()
        },
        police: PoliceState {
            body: Default::default(),
            ..state.police.clone()
        },
        rival: RivalState {
            body: Default::default(),
            grow_pending: 0,
            ..state.rival.clone()
        },
        grow_pending: 0,
        death_reason: None,
        trivia: TriviaState {
            phase: TriviaPhase::Resolved { revived: true },
            used: true,
        },
        events: vec![GameEvent::Revived],
        ..state.clone()
    }
}

/// Keep the heading unless its next cell is fatal; else the first safe one
fn safe_heading(snake: &[super::grid::Position], current: Direction) -> Direction {
    let head = snake[0];
    let body = &snake[..snake.len() - 1];
    let safe = |d: Direction| {
        let next = head.step(d);
        next.in_bounds() && !body.contains(&next)
    };
    if safe(current) {
        return current;
    }
    let reverse = if snake.len() > 1 { Some(current.opposite()) } else { None };
    Direction::ALL
        .iter()
        .copied()
        .filter(|&d| Some(d) != reverse)
        .find(|&d| safe(d))
        .unwrap_or(current)
}
