use std::cell::RefCell;
use thiserror::Error;
use viewer_core::{Changes, Command, Store, StoreError};

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The store was already borrowed, so the command was not applied.
    #[error("the scene is busy, nothing was changed; try again")]
    Busy,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Apply `command` unless the store is borrowed further up the stack.
pub fn try_dispatch(store: &RefCell<Store>, command: Command) -> Result<Changes, DispatchError> {
    let mut store = store.try_borrow_mut().map_err(|_| DispatchError::Busy)?;
    Ok(store.dispatch(command)?)
}
