use std::{
    collections::VecDeque,
    sync::mpsc::{Receiver, TryRecvError},
};

use serde::{Deserialize, Serialize};

/// Music track a player can ask for.
///
/// The engine does not play audio; track requests are handed back to the
/// host unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
pub enum Track {
    #[display("Korobeiniki")]
    Korobeiniki,
    #[display("French Suite No. 3, BWV 814: Menuet")]
    Bwv814Menuet,
    #[display("Russian song")]
    RussianSong,
}

/// An already-decoded player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    TogglePause,
    Quit,
    SelectTrack(Track),
}

/// Pull-based supply of commands.
///
/// The engine drains a source once per loop iteration, so a source only has
/// to hand out whatever is pending and return `None` when it has nothing.
pub trait CommandSource {
    fn next_command(&mut self) -> Option<Command>;
}

impl CommandSource for VecDeque<Command> {
    fn next_command(&mut self) -> Option<Command> {
        self.pop_front()
    }
}

/// Commands sent from another thread. A disconnected sender reads as `Quit`.
impl CommandSource for Receiver<Command> {
    fn next_command(&mut self) -> Option<Command> {
        match self.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Command::Quit),
        }
    }
}

impl<S> CommandSource for &mut S
where
    S: CommandSource + ?Sized,
{
    fn next_command(&mut self) -> Option<Command> {
        (**self).next_command()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn test_queue_yields_in_order() {
        let mut queue = VecDeque::from([Command::MoveLeft, Command::Rotate]);
        assert_eq!(queue.next_command(), Some(Command::MoveLeft));
        assert_eq!(queue.next_command(), Some(Command::Rotate));
        assert_eq!(queue.next_command(), None);
    }

    #[test]
    fn test_channel_source() {
        let (tx, mut rx) = mpsc::channel();
        assert_eq!(rx.next_command(), None);

        tx.send(Command::HardDrop).unwrap();
        assert_eq!(rx.next_command(), Some(Command::HardDrop));
        assert_eq!(rx.next_command(), None);

        drop(tx);
        assert_eq!(rx.next_command(), Some(Command::Quit));
    }

    #[test]
    fn test_command_serialization() {
        let json = serde_json::to_string(&Command::SelectTrack(Track::RussianSong)).unwrap();
        assert_eq!(json, r#"{"SelectTrack":"RussianSong"}"#);
        assert_eq!(
            serde_json::from_str::<Command>(r#""SoftDrop""#).unwrap(),
            Command::SoftDrop
        );
    }
}
