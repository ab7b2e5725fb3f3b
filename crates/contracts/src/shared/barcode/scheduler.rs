//! Склейка событий перерасчёта раскладки в один проход "на следующем тике".

use super::layout::RefitTrigger;

/// Планировщик перерасчёта.
///
/// Первый `request` в текущем цикле событий возвращает `true`, и вызывающий
/// должен запланировать один отложенный `flush`. Остальные запросы до `flush`
/// только накапливают причины.
#[derive(Debug, Default, Clone)]
pub struct RefitScheduler {
    pending: Vec<RefitTrigger>,
    scheduled: bool,
}

impl RefitScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зарегистрировать триггер. Возвращает `true`, если нужно запланировать flush.
    pub fn request(&mut self, trigger: RefitTrigger) -> bool {
        if !self.pending.contains(&trigger) {
            self.pending.push(trigger);
        }
        if self.scheduled {
            false
        } else {
            self.scheduled = true;
            true
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Забрать накопленные причины и разрешить следующее планирование
    pub fn flush(&mut self) -> Vec<RefitTrigger> {
        self.scheduled = false;
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_in_same_turn_are_coalesced() {
        let mut scheduler = RefitScheduler::new();
        assert!(scheduler.request(RefitTrigger::Resized));
        assert!(!scheduler.request(RefitTrigger::Resized));
        assert!(!scheduler.request(RefitTrigger::ColumnsChanged));
        assert!(scheduler.is_scheduled());

        let triggers = scheduler.flush();
        assert_eq!(
            triggers,
            vec![RefitTrigger::Resized, RefitTrigger::ColumnsChanged]
        );
        assert!(!scheduler.is_scheduled());
    }

    #[test]
    fn test_new_turn_schedules_again() {
        let mut scheduler = RefitScheduler::new();
        assert!(scheduler.request(RefitTrigger::Resized));
        scheduler.flush();
        assert!(scheduler.request(RefitTrigger::BeforePrint));
        assert_eq!(scheduler.flush(), vec![RefitTrigger::BeforePrint]);
        assert!(scheduler.flush().is_empty());
    }
}
