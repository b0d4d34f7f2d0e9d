// Handler dispatch through a role and state access through ActorContext,
// using an in-memory context that records outgoing messages.

use std::sync::Mutex;

use cacti_api::{ActorContext, ActorId, Message, Role, SendError, State};

struct RecordingContext {
    id: ActorId,
    state: State,
    sent: Mutex<Vec<(ActorId, usize)>>,
    dead: Vec<ActorId>,
}

impl RecordingContext {
    fn new(id: usize) -> Self {
        Self {
            id: ActorId(id),
            state: None,
            sent: Mutex::new(Vec::new()),
            dead: Vec::new(),
        }
    }
}

impl ActorContext for RecordingContext {
    fn id(&self) -> ActorId {
        self.id
    }

    fn send(&self, target: ActorId, message: Message) -> Result<(), SendError> {
        if self.dead.contains(&target) {
            return Err(SendError::TargetDead(target));
        }
        self.sent.lock().unwrap().push((target, message.message_type));
        Ok(())
    }

    fn state(&mut self) -> &mut State {
        &mut self.state
    }
}

fn dispatch(role: &Role, ctx: &mut dyn ActorContext, msg: &Message) {
    let handler = role.handler(msg.message_type).expect("handler");
    handler(ctx, msg);
}

#[test]
fn test_role_dispatches_by_index() {
    let role = Role::builder()
        .handler(|ctx: &mut dyn ActorContext, _: &Message| ctx.set_state(0u64))
        .handler(|ctx: &mut dyn ActorContext, msg: &Message| {
            let add = *msg.payload.downcast_ref::<u64>().unwrap();
            *ctx.state_mut::<u64>().unwrap() += add;
        })
        .build();
    assert_eq!(role.handler_count(), 2);
    assert!(role.handler(2).is_none());

    let mut ctx = RecordingContext::new(0);
    dispatch(&role, &mut ctx, &Message::bootstrap());
    dispatch(&role, &mut ctx, &Message::with_data(1, 40u64));
    dispatch(&role, &mut ctx, &Message::with_data(1, 2u64));

    let ctx: &mut dyn ActorContext = &mut ctx;
    assert_eq!(ctx.state_mut::<u64>(), Some(&mut 42));
}

#[test]
fn test_take_state_keeps_other_types() {
    let mut ctx = RecordingContext::new(0);
    let ctx: &mut dyn ActorContext = &mut ctx;
    ctx.set_state(String::from("columns"));

    assert_eq!(ctx.take_state::<u32>(), None);
    assert_eq!(ctx.take_state::<String>().as_deref(), Some("columns"));
    assert!(ctx.state().is_none());
}

#[test]
fn test_send_self_targets_own_id() {
    let mut ctx = RecordingContext::new(3);
    ctx.dead.push(ActorId(4));

    ctx.send_self(Message::godie()).unwrap();
    assert_eq!(
        ctx.send(ActorId(4), Message::signal(1)),
        Err(SendError::TargetDead(ActorId(4)))
    );
    assert_eq!(*ctx.sent.lock().unwrap(), vec![(ActorId(3), cacti_api::MSG_GODIE)]);
}
