/// Address of one unit inside a rendered chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    pub line: usize,
    pub position: usize,
}

impl UnitId {
    pub fn new(line: usize, position: usize) -> Self {
        Self { line, position }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldStrength {
    Near,
    Far,
}

/// Displacement applied to a sibling of the active unit.
///
/// `direction` is -1 for units before the active one in the line and +1 for
/// units after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldMark {
    pub strength: YieldStrength,
    pub direction: i8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterUnit {
    pub character: String,
    pub line_index: usize,
    pub position_in_line: usize,
    pub is_active: bool,
    /// Mirrors `is_active`; kept separate because presentation reads it as the
    /// expanded attribute.
    pub is_expanded: bool,
    pub yield_mark: Option<YieldMark>,
}

impl CharacterUnit {
    pub fn id(&self) -> UnitId {
        UnitId::new(self.line_index, self.position_in_line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub label: String,
    pub units: Vec<CharacterUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChapter {
    pub index: usize,
    /// `道德經 第N章`
    pub label: String,
    /// `第N章`
    pub number_label: String,
    pub lines: Vec<RenderedLine>,
}

impl RenderedChapter {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn longest_line(&self) -> usize {
        self.lines.iter().map(|line| line.units.len()).max().unwrap_or(0)
    }

    pub fn unit(&self, id: UnitId) -> Option<&CharacterUnit> {
        self.lines.get(id.line)?.units.get(id.position)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut CharacterUnit> {
        self.lines.get_mut(id.line)?.units.get_mut(id.position)
    }

    pub fn units(&self) -> impl Iterator<Item = &CharacterUnit> {
        self.lines.iter().flat_map(|line| line.units.iter())
    }

    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut CharacterUnit> {
        self.lines.iter_mut().flat_map(|line| line.units.iter_mut())
    }

    pub fn active_count(&self) -> usize {
        self.units().filter(|unit| unit.is_active).count()
    }

    /// Unit following `id` in reading order, wrapping to the first unit.
    pub fn next_unit(&self, id: Option<UnitId>) -> Option<UnitId> {
        let ids: Vec<UnitId> = self.units().map(CharacterUnit::id).collect();
        let next = match id.and_then(|id| ids.iter().position(|candidate| *candidate == id)) {
            Some(idx) => (idx + 1) % ids.len(),
            None => 0,
        };
        ids.get(next).copied()
    }

    /// Unit preceding `id` in reading order, wrapping to the last unit.
    pub fn prev_unit(&self, id: Option<UnitId>) -> Option<UnitId> {
        let ids: Vec<UnitId> = self.units().map(CharacterUnit::id).collect();
        let prev = match id.and_then(|id| ids.iter().position(|candidate| *candidate == id)) {
            Some(0) | None => ids.len().checked_sub(1)?,
            Some(idx) => idx - 1,
        };
        ids.get(prev).copied()
    }
}
