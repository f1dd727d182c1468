//! Plain-text rendering of everything the bot sends. Costs arrive as exact
//! decimals; the two-decimal display rounding happens here and only here.

use rust_decimal::Decimal;

use printquote_core::Quote;

const RULE_HEAVY: &str = "═══════════════════════════════";
const RULE_LIGHT: &str = "───────────────────────────────";

/// The itemized order report sent when a dialogue completes.
pub fn quote_report(quote: &Quote) -> String {
    let mut report = format!(
        "{RULE_HEAVY}\n\
         📊 РАСЧЕТ СТОИМОСТИ ЗАКАЗА\n\
         {RULE_HEAVY}\n\n\
         📋 Материал: {material}\n\
         📏 Размер: {width} x {height} м ({area:.2} м²)\n\
         🔢 Количество: {quantity} шт.\n\
         💰 Цена материала: {price} руб/м²\n\n\
         {RULE_LIGHT}\n\
         Стоимость печати:\n\
         {price} руб/м² × {area:.2} м² × {quantity} шт = {printing:.2} руб\n\n",
        material = quote.material,
        width = quote.width,
        height = quote.height,
        area = quote.area,
        quantity = quote.quantity,
        price = quote.price_per_sqm,
        printing = quote.printing_cost,
    );

    if quote.finishing_cost > Decimal::ZERO {
        report.push_str(&format!(
            "Дополнительные услуги:\n\
             {}: {} = {:.2} руб\n\n",
            quote.finishing, quote.finishing_details, quote.finishing_cost,
        ));
    }

    report.push_str(&format!(
        "{RULE_HEAVY}\n\
         💳 ИТОГО: {total:.2} руб\n\
         {RULE_HEAVY}\n\n\
         Для нового расчета используйте /start\n\
         Для отмены - /cancel",
        total = quote.total_cost,
    ));

    report
}

pub fn help_message() -> &'static str {
    "🤖 Бот-калькулятор широкоформатной печати\n\n\
     📋 Доступные команды:\n\
     /start - Начать новый расчет\n\
     /cancel - Отменить текущий расчет\n\
     /help - Показать эту справку\n\n\
     💡 Как пользоваться:\n\
     1. Выберите материал для печати\n\
     2. Введите размеры (например: 2.5x1.8)\n\
     3. Укажите количество экземпляров\n\
     4. Выберите дополнительные услуги\n\
     5. Получите расчет стоимости"
}

pub fn cancelled_message() -> &'static str {
    "Расчет отменен.\nДля нового расчета используйте /start"
}

/// Shown when stage input arrives while no dialogue is active.
pub fn idle_hint() -> &'static str {
    "Отправьте /start, чтобы начать расчет."
}

pub fn unknown_command_message(name: &str) -> String {
    format!("Неизвестная команда /{name}. Отправьте /help для справки.")
}
