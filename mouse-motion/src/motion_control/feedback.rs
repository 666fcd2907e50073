/// Audible and visual cues. Fire and forget.
pub trait Feedback {
    fn speaker_play_success(&mut self);

    fn speaker_play_error(&mut self);

    fn led_left_toggle(&mut self);
}
