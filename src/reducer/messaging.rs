use crate::model::{caps, AppState, BroadcastItem, Message, MessageRevision, Role};
use crate::reducer::{prepend_capped, TransitionError};

/// Delivers a message, seeding the audit trail with the body at creation if
/// the caller left it empty.
pub(super) fn send_message(state: &mut AppState, mut message: Message) -> Result<(), TransitionError> {
    if message.history.is_empty() {
        message.history.push(MessageRevision {
            body: message.body.clone(),
            timestamp: message.sent_at,
        });
    }
    message.read_at = None;
    prepend_capped(&mut state.messages, message, caps::MESSAGES);
    Ok(())
}

pub(super) fn edit_message(
    state: &mut AppState,
    message_id: &str,
    body: String,
    at: i64,
) -> Result<(), TransitionError> {
    let message = state
        .messages
        .iter_mut()
        .find(|m| m.id == message_id)
        .ok_or_else(|| TransitionError::UnknownMessage(message_id.to_string()))?;
    message.history.push(MessageRevision {
        body: body.clone(),
        timestamp: at,
    });
    message.body = body;
    message.edited_at = Some(at);
    Ok(())
}

/// One send fans out exactly one inbox message for the implicit all-students
/// audience, in the same transition as the broadcast itself.
pub(super) fn send_broadcast(
    state: &mut AppState,
    mut broadcast: BroadcastItem,
    inbox_message_id: String,
    from_name: String,
) -> Result<(), TransitionError> {
    if broadcast.history.is_empty() {
        broadcast.history.push(MessageRevision {
            body: broadcast.body.clone(),
            timestamp: broadcast.sent_at,
        });
    }
    let inbox = Message {
        id: inbox_message_id,
        created_at: broadcast.created_at,
        sent_at: broadcast.sent_at,
        from_role: Role::Principal,
        from_name,
        to_role: Role::Student,
        to_student_id: None,
        subject: broadcast.title.clone(),
        body: broadcast.body.clone(),
        edited_at: None,
        history: vec![MessageRevision {
            body: broadcast.body.clone(),
            timestamp: broadcast.sent_at,
        }],
        read_at: None,
    };
    prepend_capped(&mut state.broadcasts, broadcast, caps::BROADCASTS);
    prepend_capped(&mut state.messages, inbox, caps::MESSAGES);
    Ok(())
}

pub(super) fn edit_broadcast(
    state: &mut AppState,
    broadcast_id: &str,
    title: String,
    body: String,
    at: i64,
) -> Result<(), TransitionError> {
    let broadcast = state
        .broadcasts
        .iter_mut()
        .find(|b| b.id == broadcast_id)
        .ok_or_else(|| TransitionError::UnknownBroadcast(broadcast_id.to_string()))?;
    broadcast.history.push(MessageRevision {
        body: body.clone(),
        timestamp: at,
    });
    broadcast.title = title;
    broadcast.body = body;
    broadcast.edited_at = Some(at);
    Ok(())
}
