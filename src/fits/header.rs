//! In-memory header of a fixed-block image file.
//!
//! The header is an insertion-ordered list of [`Card`]s plus a label index
//! mapping each 8-byte label to the ordered positions of the cards carrying
//! it (repeated labels such as `HISTORY` keep all their positions). Every
//! lookup resolves to the **first** card with a matching label.
//!
//! The 36-card block invariant is applied only when the header is serialized
//! ([`FitsHeader::to_bytes`]); in memory the card list has no padding.
//!
//! Structural edits follow the classic semantics:
//! * `add_*` inserts immediately before the `END` card, or appends if there is none,
//! * `change_*` replaces the first matching card, or adds it if absent,
//! * `delete_card` removes the first matching card and compacts the list.
use std::collections::HashMap;

use itertools::Itertools;

use crate::constants::{BLOCK_LEN, CARDS_PER_BLOCK, CARD_LEN, LABEL_LEN};
use crate::fits::bitpix::Bitpix;
use crate::fits::card::{padded_label, Card};
use crate::mwdust_errors::MwDustError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsHeader {
    cards: Vec<Card>,
    index: HashMap<[u8; LABEL_LEN], Vec<usize>>,
}

impl FitsHeader {
    /// Empty header, without an `END` card.
    pub fn new() -> Self {
        FitsHeader::default()
    }

    /// Header holding only `SIMPLE = T` and `END`.
    pub fn new_primary() -> Self {
        let mut header = FitsHeader::new();
        header.add_card(Card::end());
        header.add_card(Card::new(&format!("{:<8}= {:>20}", "SIMPLE", "T")));
        header
    }

    /// Build a header from cards in file order.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut header = FitsHeader {
            cards,
            index: HashMap::new(),
        };
        header.reindex();
        header
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, card) in self.cards.iter().enumerate() {
            let mut key = [b' '; LABEL_LEN];
            key.copy_from_slice(card.label_bytes());
            self.index.entry(key).or_default().push(i);
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Position of the first card with this label.
    pub fn find_card(&self, label: &str) -> Option<usize> {
        self.index
            .get(&padded_label(label))
            .and_then(|positions| positions.first().copied())
    }

    /// Positions of every card with this label, in header order.
    pub fn find_all(&self, label: &str) -> &[usize] {
        self.index
            .get(&padded_label(label))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn card(&self, label: &str) -> Option<&Card> {
        self.find_card(label).map(|i| &self.cards[i])
    }

    /// Insert a card before `END` (or append) and return its position.
    pub fn add_card(&mut self, card: Card) -> usize {
        let at = self.find_card("END").unwrap_or(self.cards.len());
        self.cards.insert(at, card);
        self.reindex();
        at
    }

    pub fn add_card_int(&mut self, label: &str, value: i64) -> usize {
        self.add_card(Card::int(label, value))
    }

    pub fn add_card_real(&mut self, label: &str, value: f64) -> usize {
        self.add_card(Card::real(label, value))
    }

    pub fn add_card_string(&mut self, label: &str, value: &str) -> usize {
        self.add_card(Card::string(label, value))
    }

    pub fn add_comment(&mut self, text: &str) -> usize {
        self.add_card(Card::comment(text))
    }

    pub fn add_history(&mut self, text: &str) -> usize {
        self.add_card(Card::history(text))
    }

    /// Replace the first card sharing the new card's label, or add it.
    pub fn change_card(&mut self, card: Card) -> usize {
        let mut key = [b' '; LABEL_LEN];
        key.copy_from_slice(card.label_bytes());
        match self.index.get(&key).and_then(|p| p.first().copied()) {
            Some(i) => {
                self.cards[i] = card;
                i
            }
            None => self.add_card(card),
        }
    }

    pub fn change_card_int(&mut self, label: &str, value: i64) -> usize {
        self.change_card(Card::int(label, value))
    }

    pub fn change_card_real(&mut self, label: &str, value: f64) -> usize {
        self.change_card(Card::real(label, value))
    }

    pub fn change_card_string(&mut self, label: &str, value: &str) -> usize {
        self.change_card(Card::string(label, value))
    }

    /// Remove the first card with this label, returning its former position.
    pub fn delete_card(&mut self, label: &str) -> Option<usize> {
        let at = self.find_card(label)?;
        self.cards.remove(at);
        self.reindex();
        Some(at)
    }

    /// Remove every card whose label is blank; returns how many were removed.
    pub fn purge_blank_cards(&mut self) -> usize {
        let before = self.cards.len();
        self.cards.retain(|c| !c.has_blank_label());
        self.reindex();
        before - self.cards.len()
    }

    /// Make sure `NAXIS` and every `NAXISn` exist.
    ///
    /// A missing `NAXIS` becomes 0, a missing `NAXISn` becomes 1.
    pub fn add_required_cards(&mut self) {
        if self.get_int("NAXIS").is_none() {
            self.change_card_int("NAXIS", 0);
        }
        let naxis = self.get_int("NAXIS").unwrap_or(0).max(0);
        for axis in 1..=naxis {
            let label = format!("NAXIS{axis}");
            if self.get_int(&label).is_none() {
                self.change_card_int(&label, 1);
                log::warn!("Adding a card {label}");
            }
        }
    }

    pub fn get_int(&self, label: &str) -> Option<i64> {
        self.card(label).and_then(Card::int_value)
    }

    pub fn get_real(&self, label: &str) -> Option<f64> {
        self.card(label).and_then(Card::real_value)
    }

    pub fn get_string(&self, label: &str) -> Option<String> {
        self.card(label).and_then(Card::string_value)
    }

    /// Real value of a card that must be present and numeric.
    pub fn require_real(&self, label: &str) -> Result<f64, MwDustError> {
        let card = self
            .card(label)
            .ok_or_else(|| MwDustError::MissingCard(label.to_string()))?;
        card.real_value()
            .ok_or_else(|| MwDustError::InvalidCardValue {
                label: label.to_string(),
                value: String::from_utf8_lossy(&card.as_bytes()[10..30])
                    .trim()
                    .to_string(),
            })
    }

    pub fn bitpix(&self) -> Result<Bitpix, MwDustError> {
        let code = self
            .get_int("BITPIX")
            .ok_or_else(|| MwDustError::MissingCard("BITPIX".into()))?;
        Bitpix::from_code(code)
    }

    /// Linear scale (`BSCALE`, default 1) and offset (`BZERO`, default 0).
    pub fn scaling(&self) -> (f64, f64) {
        (
            self.get_real("BSCALE").unwrap_or(1.0),
            self.get_real("BZERO").unwrap_or(0.0),
        )
    }

    pub fn blank_value(&self) -> Option<f64> {
        self.get_real("BLANK")
    }

    /// Axis sizes from `NAXIS` and `NAXIS1..n`, fastest-varying first.
    pub fn axes(&self) -> Vec<usize> {
        let naxis = self.get_int("NAXIS").unwrap_or(0).max(0);
        (1..=naxis)
            .map(|i| self.get_int(&format!("NAXIS{i}")).unwrap_or(0).max(0) as usize)
            .collect()
    }

    /// Number of data elements the header declares (0 without axes).
    pub fn element_count(&self) -> usize {
        let axes = self.axes();
        if axes.is_empty() {
            0
        } else {
            axes.iter().product()
        }
    }

    /// Serialize the cards, blank padded to a whole number of 2880-byte blocks.
    pub fn to_bytes(&self) -> Vec<u8> {
        let nblocks = self.cards.len().div_ceil(CARDS_PER_BLOCK);
        let mut out = Vec::with_capacity(nblocks * BLOCK_LEN);
        for card in &self.cards {
            out.extend_from_slice(card.as_bytes());
        }
        out.resize(nblocks * BLOCK_LEN, b' ');
        debug_assert_eq!(out.len() % CARD_LEN, 0);
        out
    }
}

impl std::fmt::Display for FitsHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.cards
                .iter()
                .map(|c| c.to_string().trim_end().to_string())
                .join("\n")
        )
    }
}
