//! Swipe deck state machine.
//!
//! `Loading → Ready(0) → … → Ready(n-1) → Complete`, or `Loading → Empty`
//! when there is nothing to judge. Transitions are computed by [`reduce`],
//! which never mutates its input; the caller commits the new state.

use serde::{Deserialize, Serialize};

use crate::models::{Artwork, ArtworkCard, SwipeView, NO_ARTWORKS_MESSAGE};
use crate::services::images::ImageLocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Like,
    Dislike,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwipeEvent {
    Loaded(Vec<Artwork>),
    LoadFailed,
    Judged {
        artwork_id: String,
        decision: Decision,
    },
}

/// A loaded deck with at least one candidate left to judge
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    candidates: Vec<Artwork>,
    cursor: usize,
    liked: Vec<Artwork>,
    disliked: Vec<String>,
}

impl Deck {
    pub fn current(&self) -> &Artwork {
        &self.candidates[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn liked(&self) -> &[Artwork] {
        &self.liked
    }

    pub fn disliked(&self) -> &[String] {
        &self.disliked
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwipeState {
    Loading,
    /// Load failed or returned nothing. Terminal.
    Empty,
    Ready(Deck),
    /// Every candidate judged. Terminal.
    Complete {
        liked: Vec<Artwork>,
        disliked: Vec<String>,
    },
}

/// Hand-off from the swipe screen to the results screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub liked_ids: Vec<String>,
}

impl Navigation {
    fn from_liked(liked: &[Artwork]) -> Self {
        Self {
            liked_ids: liked.iter().map(|artwork| artwork.id.clone()).collect(),
        }
    }

    /// Results screen location carrying the liked ids as `?liked=a,b,c`
    pub fn location(&self) -> String {
        format!("/gallery?liked={}", self.liked_ids.join(","))
    }
}

/// Side effect the caller must perform after committing a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Navigate(Navigation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SwipeState,
    pub effect: Effect,
}

impl Transition {
    fn quiet(state: SwipeState) -> Self {
        Self {
            state,
            effect: Effect::None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SwipeError {
    #[error("candidates already loaded")]
    AlreadyLoaded,

    #[error("no card to judge while {0}")]
    NotReady(&'static str),

    #[error("card {got} is no longer on top, current card is {expected}")]
    StaleCard { expected: String, got: String },
}

impl SwipeState {
    pub fn label(&self) -> &'static str {
        match self {
            SwipeState::Loading => "loading",
            SwipeState::Empty => "empty",
            SwipeState::Ready(_) => "ready",
            SwipeState::Complete { .. } => "complete",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SwipeState::Empty | SwipeState::Complete { .. })
    }

    pub fn view(&self, images: &ImageLocator) -> SwipeView {
        match self {
            SwipeState::Loading => SwipeView::Loading,
            SwipeState::Empty => SwipeView::Empty {
                message: NO_ARTWORKS_MESSAGE,
            },
            SwipeState::Ready(deck) => SwipeView::Ready {
                position: deck.cursor + 1,
                total: deck.len(),
                card: ArtworkCard::new(deck.current(), images),
            },
            SwipeState::Complete { liked, disliked } => {
                let navigation = Navigation::from_liked(liked);
                SwipeView::Complete {
                    redirect: navigation.location(),
                    liked_ids: navigation.liked_ids,
                    disliked_ids: disliked.clone(),
                }
            }
        }
    }
}

/// Computes the state that follows `event`.
///
/// `Navigate` is only ever produced by the judgment that exhausts the deck,
/// so a session navigates at most once.
pub fn reduce(state: &SwipeState, event: SwipeEvent) -> Result<Transition, SwipeError> {
    match (state, event) {
        (SwipeState::Loading, SwipeEvent::Loaded(candidates)) if candidates.is_empty() => {
            Ok(Transition::quiet(SwipeState::Empty))
        }
        (SwipeState::Loading, SwipeEvent::Loaded(candidates)) => {
            Ok(Transition::quiet(SwipeState::Ready(Deck {
                candidates,
                cursor: 0,
                liked: Vec::new(),
                disliked: Vec::new(),
            })))
        }
        (SwipeState::Loading, SwipeEvent::LoadFailed) => Ok(Transition::quiet(SwipeState::Empty)),
        (_, SwipeEvent::Loaded(_) | SwipeEvent::LoadFailed) => Err(SwipeError::AlreadyLoaded),

        (
            SwipeState::Ready(deck),
            SwipeEvent::Judged {
                artwork_id,
                decision,
            },
        ) => judge(deck, artwork_id, decision),
        (other, SwipeEvent::Judged { .. }) => Err(SwipeError::NotReady(other.label())),
    }
}

fn judge(deck: &Deck, artwork_id: String, decision: Decision) -> Result<Transition, SwipeError> {
    let current = deck.current();
    if current.id != artwork_id {
        return Err(SwipeError::StaleCard {
            expected: current.id.clone(),
            got: artwork_id,
        });
    }

    let mut next = deck.clone();
    match decision {
        Decision::Like => next.liked.push(current.clone()),
        Decision::Dislike => next.disliked.push(current.id.clone()),
    }
    next.cursor += 1;

    if next.cursor < next.len() {
        return Ok(Transition::quiet(SwipeState::Ready(next)));
    }

    let navigation = Navigation::from_liked(&next.liked);
    Ok(Transition {
        state: SwipeState::Complete {
            liked: next.liked,
            disliked: next.disliked,
        },
        effect: Effect::Navigate(navigation),
    })
}
