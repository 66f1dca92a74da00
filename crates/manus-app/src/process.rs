//! Message processing
//!
//! Runs a message through the TEA update function, dispatches the action it
//! returns and follows the chain of follow-up messages.

use tokio::sync::mpsc;

use manus_api::Backend;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<B>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    backend: &B,
) where
    B: Backend + Clone + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), backend);
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
