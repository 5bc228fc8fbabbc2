use generational_arena::Index;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("node {0:?} is not in the arena")]
    StaleNode(Index),

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle { parent: Index, child: Index },
}

pub type TreeResult<T> = Result<T, TreeError>;
