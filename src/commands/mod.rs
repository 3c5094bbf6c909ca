mod call;
mod key;
mod key_press_text;
mod label;
mod mouse;
mod stop;
mod wait;

pub use call::Call;
pub use key::{KeyDown, KeyPress, KeyUp};
pub use key_press_text::KeyPressText;
pub use label::Label;
pub use mouse::{MouseClick, MouseDown, MouseMove, MouseUp, MouseWheel};
pub use stop::Stop;
pub use wait::Wait;
