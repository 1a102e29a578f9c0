use bevy::prelude::*;

use crate::touch::HapticEffect;

/// A pulse for the platform haptic layer
#[derive(Message, Debug, Clone, Copy)]
pub struct HapticRequest(pub HapticEffect);

/// Desktop and web builds have no haptic engine: log the symbolic name instead
pub fn play_haptics(mut requests: MessageReader<HapticRequest>) {
    for request in requests.read() {
        info!("haptic: {}", request.0.identifier());
    }
}
