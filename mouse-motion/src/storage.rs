//! Persistence of the best run sequence in the EEPROM emulated in flash.

use core::fmt::Debug;

use log::{error, info};

use crate::{
    config::{EEPROM_BYTE_ERASED_VALUE, EEPROM_NUM_BYTES_ERASED_CHECKED, FLASH_EEPROM_ADDRESS_MAZE, RUN_SEQUENCE_LEN},
    run_sequence::RunSequence,
};

const MAZE_RECORD_LEN: usize = RUN_SEQUENCE_LEN + 1;

#[cfg_attr(test, mockall::automock(type Error = u8;))]
pub trait Eeprom {
    type Error: Debug;

    fn erase_page(&mut self, address: u32) -> Result<(), Self::Error>;

    fn flash_page(&mut self, address: u32, data: &[u8]) -> Result<(), Self::Error>;

    fn read_data(&self, address: u32, buffer: &mut [u8]);
}

/// Saved maze run sequence, stored as a zero terminated string
pub struct MazeStore<E: Eeprom> {
    eeprom: E,
}

impl<E: Eeprom> MazeStore<E> {
    pub fn new(eeprom: E) -> Self {
        Self { eeprom }
    }

    pub fn into_inner(self) -> E {
        self.eeprom
    }

    pub fn save_maze(&mut self, sequence: &RunSequence) {
        let mut record = [0u8; MAZE_RECORD_LEN];
        let bytes = sequence.as_str().as_bytes();
        record[..bytes.len()].copy_from_slice(bytes);

        match self.eeprom.flash_page(FLASH_EEPROM_ADDRESS_MAZE, &record) {
            Ok(()) => info!("Maze saved"),
            Err(err) => error!("Unable to save the maze: {:?}", err),
        }
    }

    /// Load the saved sequence. An unreadable record leaves `sequence` empty.
    pub fn load_maze(&self, sequence: &mut RunSequence) {
        let mut record = [EEPROM_BYTE_ERASED_VALUE; MAZE_RECORD_LEN];
        self.eeprom.read_data(FLASH_EEPROM_ADDRESS_MAZE, &mut record);

        sequence.clear();
        for &byte in record.iter().take_while(|b| **b != 0 && **b != EEPROM_BYTE_ERASED_VALUE) {
            if let Err(err) = sequence.push(byte as char) {
                error!("Corrupted maze record: {}", err);
                sequence.clear();
                return;
            }
        }
        info!("Maze loaded: {}", sequence);
    }

    pub fn reset_maze(&mut self) {
        if let Err(err) = self.eeprom.erase_page(FLASH_EEPROM_ADDRESS_MAZE) {
            error!("Unable to erase the maze: {:?}", err);
        }
    }

    pub fn maze_is_saved(&self) -> bool {
        let mut head = [EEPROM_BYTE_ERASED_VALUE; EEPROM_NUM_BYTES_ERASED_CHECKED];
        self.eeprom.read_data(FLASH_EEPROM_ADDRESS_MAZE, &mut head);
        head.iter().any(|b| *b != EEPROM_BYTE_ERASED_VALUE)
    }
}
