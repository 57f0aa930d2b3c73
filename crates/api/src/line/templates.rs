//! Order notification message builders.
//!
//! Pure functions from an order (with joined item/product/brand data) to an
//! outgoing LINE message. Labels are hard-coded Thai; amounts render through
//! [`Baht`]'s `฿` thousands-separated display. Deterministic for a given
//! order: the date shown is the order's creation time, not the build time.

use chrono::FixedOffset;

use malai_core::Baht;

use super::OutgoingMessage;
use super::events::PostbackAction;
use super::flex::{
    Bubble, FlexAction, FlexBox, FlexButton, FlexComponent, FlexContainer, FlexImage,
    FlexSeparator, FlexText,
};
use crate::models::{Order, OrderItemDetail, OrderWithItems};

/// Shown when a product has no image.
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/100x100";

/// Shown when a product has no brand.
const UNKNOWN_BRAND: &str = "ไม่ทราบแบรนด์";

const LABEL_COLOR: &str = "#666666";
const HEADING_COLOR: &str = "#333333";
const ACCENT_COLOR: &str = "#FF6B9D";
const CONFIRM_COLOR: &str = "#28a745";
const CANCEL_COLOR: &str = "#dc3545";

/// Which notification a message renders as.
///
/// Controls the header color, the alt text, and which action buttons the
/// footer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Pushed to the operations account right after checkout.
    NewOrder,
    /// Replied to the operator after a confirm action.
    Confirmed,
    /// Replied to the operator after a cancel action.
    Cancelled,
}

impl NotificationKind {
    const fn header_color(self) -> &'static str {
        match self {
            Self::NewOrder => ACCENT_COLOR,
            Self::Confirmed => CONFIRM_COLOR,
            Self::Cancelled => CANCEL_COLOR,
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::NewOrder => "🛍️ คำสั่งซื้อใหม่",
            Self::Confirmed => "✅ ยืนยันคำสั่งซื้อแล้ว",
            Self::Cancelled => "❌ ยกเลิกคำสั่งซื้อแล้ว",
        }
    }

    fn alt_text(self, order_number: &str) -> String {
        match self {
            Self::NewOrder => format!("คำสั่งซื้อใหม่ #{order_number}"),
            Self::Confirmed => format!("ยืนยันคำสั่งซื้อ #{order_number} แล้ว"),
            Self::Cancelled => format!("ยกเลิกคำสั่งซื้อ #{order_number} แล้ว"),
        }
    }
}

/// Build the flex notification for an order.
#[must_use]
pub fn order_message(kind: NotificationKind, order: &OrderWithItems) -> OutgoingMessage {
    let bubble = Bubble::kilo()
        .header(header(kind, &order.order))
        .body(body(order))
        .footer(footer(kind, &order.order));

    OutgoingMessage::flex(
        kind.alt_text(&order.order.order_number),
        FlexContainer::bubble(bubble),
    )
}

fn header(kind: NotificationKind, order: &Order) -> FlexBox {
    FlexBox::vertical(vec![
        FlexText::new(kind.title())
            .bold()
            .color("#ffffff")
            .size("lg")
            .component(),
        FlexText::new(format!("#{}", order.order_number))
            .color("#ffffff")
            .size("md")
            .margin("sm")
            .component(),
    ])
    .background_color(kind.header_color())
    .padding_all("20px")
}

fn body(order: &OrderWithItems) -> FlexBox {
    let mut contents = vec![
        customer_section(&order.order),
        FlexSeparator::margin("lg"),
        items_section(&order.items),
        FlexSeparator::margin("lg"),
        totals_section(&order.order),
        date_row(&order.order),
    ];

    if let Some(notes) = order
        .order
        .notes
        .as_deref()
        .filter(|notes| !notes.is_empty())
    {
        contents.push(notes_section(notes));
    }

    FlexBox::vertical(contents).padding_all("20px")
}

fn customer_section(order: &Order) -> FlexComponent {
    let name_row = FlexBox::horizontal(vec![
        FlexText::new("ชื่อ:").size("sm").color(LABEL_COLOR).flex(1).component(),
        FlexText::new(&order.shipping_name)
            .size("sm")
            .bold()
            .flex(2)
            .wrap()
            .component(),
    ]);
    let phone_row = FlexBox::horizontal(vec![
        FlexText::new("เบอร์:").size("sm").color(LABEL_COLOR).flex(1).component(),
        FlexText::new(&order.shipping_phone).size("sm").flex(2).component(),
    ])
    .margin("sm");
    let address_row = FlexBox::horizontal(vec![
        FlexText::new("ที่อยู่:").size("sm").color(LABEL_COLOR).flex(1).component(),
        FlexText::new(&order.shipping_address)
            .size("sm")
            .flex(2)
            .wrap()
            .component(),
    ])
    .margin("sm");

    FlexBox::vertical(vec![
        FlexText::new("👤 ข้อมูลลูกค้า")
            .bold()
            .size("md")
            .color(HEADING_COLOR)
            .component(),
        FlexBox::vertical(vec![
            name_row.component(),
            phone_row.component(),
            address_row.component(),
        ])
        .margin("sm")
        .component(),
    ])
    .component()
}

fn items_section(items: &[OrderItemDetail]) -> FlexComponent {
    let mut contents = vec![
        FlexText::new("🛒 รายการสินค้า")
            .bold()
            .size("md")
            .color(HEADING_COLOR)
            .component(),
    ];
    contents.extend(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| item_block(item, index > 0)),
    );

    FlexBox::vertical(contents).margin("lg").component()
}

fn item_block(item: &OrderItemDetail, after_first: bool) -> FlexComponent {
    let image_url = item.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE);
    let brand = item.brand_name.as_deref().unwrap_or(UNKNOWN_BRAND);

    let mut details = vec![
        FlexText::new(&item.product_name).bold().size("sm").wrap().component(),
        FlexText::new(brand).size("xs").color(LABEL_COLOR).component(),
        FlexBox::horizontal(vec![
            FlexText::new(format!("จำนวน: {}", item.quantity))
                .size("xs")
                .color(LABEL_COLOR)
                .flex(1)
                .component(),
            FlexText::new(item.line_total().display())
                .size("sm")
                .bold()
                .color(ACCENT_COLOR)
                .align_end()
                .component(),
        ])
        .margin("sm")
        .component(),
    ];
    if let Some(size) = &item.size {
        details.push(
            FlexText::new(format!("ไซส์: {size}"))
                .size("xs")
                .color(LABEL_COLOR)
                .component(),
        );
    }
    if let Some(color) = &item.color {
        details.push(
            FlexText::new(format!("สี: {color}"))
                .size("xs")
                .color(LABEL_COLOR)
                .component(),
        );
    }

    let row = FlexBox::horizontal(vec![
        FlexImage::thumbnail(image_url, "60px").component(),
        FlexBox::vertical(details).flex(1).margin("sm").component(),
    ]);
    let row = if after_first { row.margin("md") } else { row };

    FlexBox::vertical(vec![row.component(), FlexSeparator::margin("md")]).component()
}

fn totals_section(order: &Order) -> FlexComponent {
    let subtotal = order.total_amount - order.shipping_fee;

    FlexBox::vertical(vec![
        FlexText::new("💰 สรุปคำสั่งซื้อ")
            .bold()
            .size("md")
            .color(HEADING_COLOR)
            .component(),
        amount_row("ยอดรวมสินค้า:", subtotal, false),
        amount_row("ค่าจัดส่ง:", order.shipping_fee, false),
        FlexSeparator::margin("sm"),
        amount_row("ยอดรวมทั้งหมด:", order.total_amount, true),
    ])
    .component()
}

fn amount_row(label: &str, amount: Baht, emphasized: bool) -> FlexComponent {
    let (label_text, value_text) = if emphasized {
        (
            FlexText::new(label).size("md").bold().color(HEADING_COLOR),
            FlexText::new(amount.display())
                .size("md")
                .bold()
                .color(ACCENT_COLOR)
                .align_end(),
        )
    } else {
        (
            FlexText::new(label).size("sm").color(LABEL_COLOR),
            FlexText::new(amount.display()).size("sm").align_end(),
        )
    };

    FlexBox::horizontal(vec![label_text.component(), value_text.component()])
        .margin("sm")
        .component()
}

fn date_row(order: &Order) -> FlexComponent {
    FlexBox::horizontal(vec![
        FlexText::new("📅 วันที่สั่งซื้อ:")
            .size("xs")
            .color(LABEL_COLOR)
            .component(),
        FlexText::new(order_date(order))
            .size("xs")
            .color(LABEL_COLOR)
            .align_end()
            .component(),
    ])
    .margin("lg")
    .component()
}

/// The order creation time rendered in Bangkok time (UTC+7).
fn order_date(order: &Order) -> String {
    let bangkok = FixedOffset::east_opt(7 * 3600).expect("UTC+7 is a valid offset");
    order
        .created_at
        .with_timezone(&bangkok)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

fn notes_section(notes: &str) -> FlexComponent {
    FlexBox::vertical(vec![
        FlexText::new("📝 หมายเหตุ:")
            .size("sm")
            .bold()
            .color(HEADING_COLOR)
            .component(),
        FlexText::new(notes)
            .size("sm")
            .color(LABEL_COLOR)
            .wrap()
            .margin("sm")
            .component(),
    ])
    .margin("lg")
    .component()
}

fn footer(kind: NotificationKind, order: &Order) -> FlexBox {
    let buttons = match kind {
        NotificationKind::NewOrder => vec![
            FlexButton::postback(FlexAction::Postback {
                label: "✅ ยืนยันคำสั่งซื้อ".to_owned(),
                data: PostbackAction::ConfirmOrder { order_id: order.id }.data(),
            })
            .style("primary")
            .color(CONFIRM_COLOR)
            .component(),
            FlexButton::postback(FlexAction::Postback {
                label: "❌ ยกเลิกคำสั่งซื้อ".to_owned(),
                data: PostbackAction::CancelOrder { order_id: order.id }.data(),
            })
            .style("secondary")
            .color(CANCEL_COLOR)
            .margin("sm")
            .component(),
        ],
        NotificationKind::Confirmed => vec![
            FlexButton::postback(FlexAction::Postback {
                label: "🚚 อัปเดตการจัดส่ง".to_owned(),
                data: PostbackAction::UpdateShipping { order_id: order.id }.data(),
            })
            .style("primary")
            .color(ACCENT_COLOR)
            .component(),
        ],
        NotificationKind::Cancelled => vec![
            FlexButton::postback(FlexAction::Postback {
                label: "📞 ติดต่อลูกค้า".to_owned(),
                data: PostbackAction::ContactCustomer {
                    phone: order.shipping_phone.clone(),
                }
                .data(),
            })
            .style("primary")
            .color(CANCEL_COLOR)
            .component(),
        ],
    };

    FlexBox::vertical(buttons).padding_all("20px")
}

/// Plain-text reply for the contact-customer action.
#[must_use]
pub fn contact_customer_text(phone: &str) -> String {
    format!("📞 ติดต่อลูกค้า: {phone}\n\nคุณสามารถโทรหาลูกค้าได้ที่หมายเลขนี้")
}

/// Plain-text reply for the update-shipping action: the order's shipping
/// contact, read-only. Fulfillment steps have no handler yet.
#[must_use]
pub fn shipping_info_text(order: &Order) -> String {
    format!(
        "🚚 ข้อมูลจัดส่ง #{}\nชื่อ: {}\nเบอร์: {}\nที่อยู่: {}\nสถานะ: {}",
        order.order_number,
        order.shipping_name,
        order.shipping_phone,
        order.shipping_address,
        order.status.label_th(),
    )
}

/// Plain-text reply when an order referenced by a postback cannot be fetched.
#[must_use]
pub fn order_fetch_failed_text() -> String {
    "ขออภัย ไม่สามารถดึงข้อมูลคำสั่งซื้อได้".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use malai_core::{Baht, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

    fn sample_order() -> OrderWithItems {
        let created_at = Utc.with_ymd_and_hms(2024, 11, 5, 9, 30, 0).single().expect("valid");
        OrderWithItems {
            order: Order {
                id: OrderId::new(42),
                order_number: "ORD1730799000000".to_owned(),
                user_id: UserId::new(1),
                status: OrderStatus::Pending,
                total_amount: Baht::from_whole(1150),
                shipping_fee: Baht::from_whole(50),
                shipping_name: "สมหญิง ใจดี".to_owned(),
                shipping_phone: "081-234-5678".to_owned(),
                shipping_address: "99/1 ถนนสุขุมวิท กรุงเทพฯ".to_owned(),
                notes: Some("ฝากไว้หน้าบ้าน".to_owned()),
                created_at,
                updated_at: created_at,
            },
            items: vec![
                OrderItemDetail {
                    id: OrderItemId::new(1),
                    product_id: ProductId::new(10),
                    quantity: 1,
                    price: Baht::from_whole(500),
                    size: Some("M".to_owned()),
                    color: None,
                    product_name: "เสื้อยืดลายดอก".to_owned(),
                    brand_name: Some("Malai".to_owned()),
                    image_url: Some("https://cdn.example/tee.jpg".to_owned()),
                },
                OrderItemDetail {
                    id: OrderItemId::new(2),
                    product_id: ProductId::new(11),
                    quantity: 2,
                    price: Baht::from_whole(300),
                    size: None,
                    color: Some("ขาว".to_owned()),
                    product_name: "กางเกงขาสั้น".to_owned(),
                    brand_name: None,
                    image_url: None,
                },
            ],
        }
    }

    fn render(kind: NotificationKind) -> serde_json::Value {
        serde_json::to_value(order_message(kind, &sample_order())).expect("serialize")
    }

    #[test]
    fn new_order_header_and_alt_text() {
        let json = render(NotificationKind::NewOrder);
        assert_eq!(json["altText"], "คำสั่งซื้อใหม่ #ORD1730799000000");
        let header = &json["contents"]["header"];
        assert_eq!(header["backgroundColor"], "#FF6B9D");
        assert_eq!(header["contents"][0]["text"], "🛍️ คำสั่งซื้อใหม่");
        assert_eq!(header["contents"][1]["text"], "#ORD1730799000000");
    }

    #[test]
    fn header_color_varies_by_kind() {
        let confirmed = render(NotificationKind::Confirmed);
        assert_eq!(
            confirmed["contents"]["header"]["backgroundColor"],
            "#28a745"
        );
        let cancelled = render(NotificationKind::Cancelled);
        assert_eq!(
            cancelled["contents"]["header"]["backgroundColor"],
            "#dc3545"
        );
    }

    #[test]
    fn totals_render_with_baht_formatting() {
        let json = render(NotificationKind::NewOrder);
        let rendered = json.to_string();
        assert!(rendered.contains("฿1,100"));
        assert!(rendered.contains("฿50"));
        assert!(rendered.contains("฿1,150"));
    }

    #[test]
    fn item_blocks_carry_options_and_line_totals() {
        let json = render(NotificationKind::NewOrder);
        let rendered = json.to_string();
        assert!(rendered.contains("ไซส์: M"));
        assert!(rendered.contains("สี: ขาว"));
        // 300 x 2
        assert!(rendered.contains("฿600"));
        assert!(rendered.contains(UNKNOWN_BRAND));
        assert!(rendered.contains(PLACEHOLDER_IMAGE));
    }

    #[test]
    fn new_order_footer_encodes_confirm_and_cancel() {
        let json = render(NotificationKind::NewOrder);
        let footer = &json["contents"]["footer"]["contents"];
        assert_eq!(
            footer[0]["action"]["data"],
            "action=confirm_order&order_id=42"
        );
        assert_eq!(
            footer[1]["action"]["data"],
            "action=cancel_order&order_id=42"
        );
    }

    #[test]
    fn confirmed_footer_encodes_update_shipping() {
        let json = render(NotificationKind::Confirmed);
        let footer = &json["contents"]["footer"]["contents"];
        assert_eq!(
            footer[0]["action"]["data"],
            "action=update_shipping&order_id=42"
        );
    }

    #[test]
    fn cancelled_footer_encodes_contact_customer_phone() {
        let json = render(NotificationKind::Cancelled);
        let data = json["contents"]["footer"]["contents"][0]["action"]["data"]
            .as_str()
            .expect("data string");
        let action = PostbackAction::parse(data).expect("parse");
        assert_eq!(
            action,
            PostbackAction::ContactCustomer {
                phone: "081-234-5678".to_owned()
            }
        );
    }

    #[test]
    fn notes_are_included_when_present() {
        let json = render(NotificationKind::NewOrder);
        assert!(json.to_string().contains("ฝากไว้หน้าบ้าน"));

        let mut order = sample_order();
        order.order.notes = None;
        let without =
            serde_json::to_value(order_message(NotificationKind::NewOrder, &order))
                .expect("serialize");
        assert!(!without.to_string().contains("📝 หมายเหตุ:"));
    }

    #[test]
    fn date_renders_in_bangkok_time() {
        let json = render(NotificationKind::NewOrder);
        // 09:30 UTC is 16:30 in Bangkok.
        assert!(json.to_string().contains("05/11/2024 16:30"));
    }

    #[test]
    fn message_is_deterministic() {
        let first = render(NotificationKind::NewOrder);
        let second = render(NotificationKind::NewOrder);
        assert_eq!(first, second);
    }
}
