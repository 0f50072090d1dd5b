//! ERP 記錄存放區（Record Store）
//!
//! 每個 ERP 工作表對應一個型別化的結構，欄位名稱透過 serde 保留 ERP 原生
//! （韓文）欄位名，作為與外部呼叫端的整合契約。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;

/// 工作表名稱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    #[serde(rename = "거래처마스터")]
    Partners,
    #[serde(rename = "품목마스터")]
    Items,
    #[serde(rename = "BOM")]
    Bom,
    #[serde(rename = "수주")]
    SalesOrders,
    #[serde(rename = "구매발주")]
    PurchaseOrders,
    #[serde(rename = "자재입고")]
    InboundReceipts,
    #[serde(rename = "작업지시")]
    WorkOrders,
    #[serde(rename = "출하")]
    Shipments,
    #[serde(rename = "재고")]
    Inventory,
    #[serde(rename = "회계(AR_AP)")]
    Accounting,
    #[serde(rename = "인사급여")]
    Employees,
    #[serde(rename = "근태관리")]
    Attendance,
}

impl Table {
    /// ERP 原生工作表名稱
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Partners => "거래처마스터",
            Table::Items => "품목마스터",
            Table::Bom => "BOM",
            Table::SalesOrders => "수주",
            Table::PurchaseOrders => "구매발주",
            Table::InboundReceipts => "자재입고",
            Table::WorkOrders => "작업지시",
            Table::Shipments => "출하",
            Table::Inventory => "재고",
            Table::Accounting => "회계(AR_AP)",
            Table::Employees => "인사급여",
            Table::Attendance => "근태관리",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 以 ERP 原生欄位名讀取鍵值
///
/// 回傳 `None` 表示該記錄型別沒有此欄位；欄位存在但為空時回傳空字串。
pub trait Record {
    fn field(&self, name: &str) -> Option<&str>;
}

/// 交易對象區分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PartnerKind {
    #[serde(rename = "공급업체")]
    Supplier,
    #[serde(rename = "고객")]
    Customer,
    #[default]
    #[serde(rename = "기타")]
    Other,
}

impl From<&str> for PartnerKind {
    fn from(raw: &str) -> Self {
        match raw {
            "공급업체" | "공급사" => PartnerKind::Supplier,
            "고객" | "고객사" => PartnerKind::Customer,
            _ => PartnerKind::Other,
        }
    }
}

/// 品目區分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ItemCategory {
    #[serde(rename = "완제품")]
    FinishedGood,
    #[serde(rename = "반제품")]
    SemiFinished,
    #[serde(rename = "원자재")]
    RawMaterial,
    #[serde(rename = "부자재")]
    SubMaterial,
    #[default]
    #[serde(rename = "기타")]
    Other,
}

impl From<&str> for ItemCategory {
    fn from(raw: &str) -> Self {
        match raw {
            "완제품" => ItemCategory::FinishedGood,
            "반제품" => ItemCategory::SemiFinished,
            "원자재" => ItemCategory::RawMaterial,
            "부자재" => ItemCategory::SubMaterial,
            _ => ItemCategory::Other,
        }
    }
}

impl ItemCategory {
    /// 是否為可建立 LOT 的物料（原材料或副材料）
    pub fn is_material(&self) -> bool {
        matches!(self, ItemCategory::RawMaterial | ItemCategory::SubMaterial)
    }
}

/// 交易對象主檔（客戶與供應商共用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partner {
    #[serde(rename = "거래처코드", default, deserialize_with = "lenient::string")]
    pub code: String,

    #[serde(rename = "거래처명", default, deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(
        rename = "거래처구분",
        alias = "구분",
        default,
        deserialize_with = "lenient::label"
    )]
    pub kind: PartnerKind,
}

impl Partner {
    pub fn new(code: impl Into<String>, name: impl Into<String>, kind: PartnerKind) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind,
        }
    }
}

impl Record for Partner {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "거래처코드" => Some(self.code.as_str()),
            "거래처명" => Some(self.name.as_str()),
            _ => None,
        }
    }
}

/// 品目主檔
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "품목코드", default, deserialize_with = "lenient::string")]
    pub code: String,

    #[serde(rename = "품목명", default, deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(rename = "품목구분", default, deserialize_with = "lenient::label")]
    pub category: ItemCategory,

    #[serde(rename = "단위", default, deserialize_with = "lenient::string")]
    pub unit: String,
}

impl Item {
    pub fn new(code: impl Into<String>, name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            unit: String::new(),
        }
    }

    /// 建構器模式：設置單位
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

impl Record for Item {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "품목코드" => Some(self.code.as_str()),
            "품목명" => Some(self.name.as_str()),
            "단위" => Some(self.unit.as_str()),
            _ => None,
        }
    }
}

/// BOM 明細（單層父子關係）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BomLine {
    #[serde(rename = "상위품목코드", default, deserialize_with = "lenient::string")]
    pub parent_code: String,

    #[serde(rename = "하위품목코드", default, deserialize_with = "lenient::string")]
    pub child_code: String,

    #[serde(rename = "하위품목명", default, deserialize_with = "lenient::string")]
    pub child_name: String,

    /// 單位用量
    #[serde(rename = "소요량", default, deserialize_with = "lenient::decimal")]
    pub quantity: Decimal,

    #[serde(rename = "단위", default, deserialize_with = "lenient::string")]
    pub unit: String,
}

impl BomLine {
    pub fn new(
        parent_code: impl Into<String>,
        child_code: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        Self {
            parent_code: parent_code.into(),
            child_code: child_code.into(),
            quantity,
            ..Default::default()
        }
    }
}

impl Record for BomLine {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "상위품목코드" => Some(self.parent_code.as_str()),
            "하위품목코드" => Some(self.child_code.as_str()),
            "하위품목명" => Some(self.child_name.as_str()),
            "단위" => Some(self.unit.as_str()),
            _ => None,
        }
    }
}

/// 受注
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesOrder {
    #[serde(rename = "수주번호", default, deserialize_with = "lenient::string")]
    pub order_no: String,

    #[serde(rename = "거래처코드", default, deserialize_with = "lenient::string")]
    pub customer_code: String,

    #[serde(rename = "품목코드", default, deserialize_with = "lenient::string")]
    pub item_code: String,

    #[serde(rename = "수주수량", default, deserialize_with = "lenient::decimal")]
    pub quantity: Decimal,

    #[serde(rename = "수주일자", default, deserialize_with = "lenient::date")]
    pub order_date: Option<NaiveDate>,

    #[serde(rename = "납기일자", default, deserialize_with = "lenient::date")]
    pub due_date: Option<NaiveDate>,

    #[serde(rename = "상태", default, deserialize_with = "lenient::string")]
    pub status: String,
}

impl SalesOrder {
    pub fn new(
        order_no: impl Into<String>,
        customer_code: impl Into<String>,
        item_code: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        Self {
            order_no: order_no.into(),
            customer_code: customer_code.into(),
            item_code: item_code.into(),
            quantity,
            ..Default::default()
        }
    }
}

impl Record for SalesOrder {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "수주번호" => Some(self.order_no.as_str()),
            "거래처코드" => Some(self.customer_code.as_str()),
            "품목코드" => Some(self.item_code.as_str()),
            "상태" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

/// 採購發注
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseOrder {
    #[serde(rename = "발주번호", default, deserialize_with = "lenient::string")]
    pub order_no: String,

    #[serde(rename = "거래처코드", default, deserialize_with = "lenient::string")]
    pub supplier_code: String,

    #[serde(rename = "품목코드", default, deserialize_with = "lenient::string")]
    pub item_code: String,

    #[serde(rename = "발주수량", default, deserialize_with = "lenient::decimal")]
    pub quantity: Decimal,

    #[serde(rename = "발주일자", default, deserialize_with = "lenient::date")]
    pub order_date: Option<NaiveDate>,

    #[serde(rename = "상태", default, deserialize_with = "lenient::string")]
    pub status: String,
}

impl PurchaseOrder {
    pub fn new(
        order_no: impl Into<String>,
        supplier_code: impl Into<String>,
        item_code: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        Self {
            order_no: order_no.into(),
            supplier_code: supplier_code.into(),
            item_code: item_code.into(),
            quantity,
            ..Default::default()
        }
    }
}

impl Record for PurchaseOrder {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "발주번호" => Some(self.order_no.as_str()),
            "거래처코드" => Some(self.supplier_code.as_str()),
            "품목코드" => Some(self.item_code.as_str()),
            "상태" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

/// 物料入庫
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundReceipt {
    #[serde(rename = "입고번호", default, deserialize_with = "lenient::string")]
    pub receipt_no: String,

    #[serde(rename = "구매발주번호", default, deserialize_with = "lenient::string")]
    pub purchase_order_no: String,

    #[serde(rename = "품목코드", default, deserialize_with = "lenient::string")]
    pub item_code: String,

    #[serde(rename = "거래처코드", default, deserialize_with = "lenient::string")]
    pub supplier_code: String,

    #[serde(rename = "입고수량", default, deserialize_with = "lenient::decimal")]
    pub quantity: Decimal,

    #[serde(rename = "입고일자", default, deserialize_with = "lenient::date")]
    pub inbound_date: Option<NaiveDate>,

    /// 品質狀態（passed / pending / failed / quarantine），空白視為 passed
    #[serde(rename = "품질상태", default, deserialize_with = "lenient::string")]
    pub quality_status: String,

    #[serde(rename = "창고위치", default, deserialize_with = "lenient::string")]
    pub location: String,
}

impl InboundReceipt {
    pub fn new(
        item_code: impl Into<String>,
        supplier_code: impl Into<String>,
        quantity: Decimal,
        inbound_date: NaiveDate,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            supplier_code: supplier_code.into(),
            quantity,
            inbound_date: Some(inbound_date),
            ..Default::default()
        }
    }

    /// 建構器模式：設置採購發注號
    pub fn with_purchase_order(mut self, purchase_order_no: impl Into<String>) -> Self {
        self.purchase_order_no = purchase_order_no.into();
        self
    }

    /// 建構器模式：設置倉位
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

impl Record for InboundReceipt {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "입고번호" => Some(self.receipt_no.as_str()),
            "구매발주번호" => Some(self.purchase_order_no.as_str()),
            "품목코드" => Some(self.item_code.as_str()),
            "거래처코드" => Some(self.supplier_code.as_str()),
            "품질상태" => Some(self.quality_status.as_str()),
            "창고위치" => Some(self.location.as_str()),
            _ => None,
        }
    }
}

/// 作業指示（工單）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkOrder {
    #[serde(rename = "작업지시번호", default, deserialize_with = "lenient::string")]
    pub order_no: String,

    #[serde(rename = "수주번호", default, deserialize_with = "lenient::string")]
    pub sales_order_no: String,

    #[serde(rename = "품목코드", default, deserialize_with = "lenient::string")]
    pub item_code: String,

    #[serde(rename = "지시수량", default, deserialize_with = "lenient::decimal")]
    pub quantity: Decimal,

    #[serde(rename = "시작일자", default, deserialize_with = "lenient::date")]
    pub start_date: Option<NaiveDate>,

    #[serde(rename = "완료일자", default, deserialize_with = "lenient::date")]
    pub end_date: Option<NaiveDate>,

    #[serde(rename = "라인", default, deserialize_with = "lenient::string")]
    pub line: String,

    #[serde(rename = "상태", default, deserialize_with = "lenient::string")]
    pub status: String,
}

impl WorkOrder {
    pub fn new(
        order_no: impl Into<String>,
        item_code: impl Into<String>,
        quantity: Decimal,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            order_no: order_no.into(),
            item_code: item_code.into(),
            quantity,
            start_date: Some(start_date),
            ..Default::default()
        }
    }

    /// 建構器模式：設置受注號
    pub fn with_sales_order(mut self, sales_order_no: impl Into<String>) -> Self {
        self.sales_order_no = sales_order_no.into();
        self
    }

    /// 建構器模式：設置狀態
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// 建構器模式：設置產線
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = line.into();
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }
}

impl Record for WorkOrder {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "작업지시번호" => Some(self.order_no.as_str()),
            "수주번호" => Some(self.sales_order_no.as_str()),
            "품목코드" => Some(self.item_code.as_str()),
            "라인" => Some(self.line.as_str()),
            "상태" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

/// 出貨
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shipment {
    #[serde(rename = "출하번호", default, deserialize_with = "lenient::string")]
    pub shipment_no: String,

    #[serde(rename = "수주번호", default, deserialize_with = "lenient::string")]
    pub sales_order_no: String,

    #[serde(rename = "작업지시번호", default, deserialize_with = "lenient::string")]
    pub work_order_no: String,

    #[serde(rename = "거래처코드", default, deserialize_with = "lenient::string")]
    pub customer_code: String,

    #[serde(rename = "품목코드", default, deserialize_with = "lenient::string")]
    pub item_code: String,

    #[serde(rename = "출하수량", default, deserialize_with = "lenient::decimal")]
    pub quantity: Decimal,

    #[serde(rename = "출하일자", default, deserialize_with = "lenient::date")]
    pub shipped_date: Option<NaiveDate>,

    #[serde(rename = "상태", default, deserialize_with = "lenient::string")]
    pub status: String,
}

impl Shipment {
    pub fn new(
        shipment_no: impl Into<String>,
        customer_code: impl Into<String>,
        item_code: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        Self {
            shipment_no: shipment_no.into(),
            customer_code: customer_code.into(),
            item_code: item_code.into(),
            quantity,
            ..Default::default()
        }
    }

    /// 建構器模式：設置受注號
    pub fn with_sales_order(mut self, sales_order_no: impl Into<String>) -> Self {
        self.sales_order_no = sales_order_no.into();
        self
    }
}

impl Record for Shipment {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "출하번호" => Some(self.shipment_no.as_str()),
            "수주번호" => Some(self.sales_order_no.as_str()),
            "작업지시번호" => Some(self.work_order_no.as_str()),
            "거래처코드" => Some(self.customer_code.as_str()),
            "품목코드" => Some(self.item_code.as_str()),
            "상태" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

/// 現有庫存
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "품목코드", default, deserialize_with = "lenient::string")]
    pub item_code: String,

    #[serde(rename = "창고코드", default, deserialize_with = "lenient::string")]
    pub warehouse_code: String,

    #[serde(rename = "현재고", default, deserialize_with = "lenient::decimal")]
    pub on_hand: Decimal,
}

impl InventoryRecord {
    pub fn new(item_code: impl Into<String>, on_hand: Decimal) -> Self {
        Self {
            item_code: item_code.into(),
            on_hand,
            ..Default::default()
        }
    }
}

impl Record for InventoryRecord {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "품목코드" => Some(self.item_code.as_str()),
            "창고코드" => Some(self.warehouse_code.as_str()),
            _ => None,
        }
    }
}

/// 應收 / 應付傳票
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountingEntry {
    #[serde(rename = "전표번호", default, deserialize_with = "lenient::string")]
    pub voucher_no: String,

    /// 매출채권 / 매입채무
    #[serde(rename = "구분", default, deserialize_with = "lenient::string")]
    pub kind: String,

    #[serde(rename = "거래처코드", default, deserialize_with = "lenient::string")]
    pub partner_code: String,

    #[serde(rename = "금액", default, deserialize_with = "lenient::decimal")]
    pub amount: Decimal,

    #[serde(rename = "발생일자", default, deserialize_with = "lenient::date")]
    pub posted_date: Option<NaiveDate>,
}

impl AccountingEntry {
    pub fn new(
        voucher_no: impl Into<String>,
        partner_code: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            voucher_no: voucher_no.into(),
            partner_code: partner_code.into(),
            amount,
            ..Default::default()
        }
    }
}

impl Record for AccountingEntry {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "전표번호" => Some(self.voucher_no.as_str()),
            "구분" => Some(self.kind.as_str()),
            "거래처코드" => Some(self.partner_code.as_str()),
            _ => None,
        }
    }
}

/// 員工（人事薪資）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "사번", default, deserialize_with = "lenient::string")]
    pub employee_no: String,

    #[serde(rename = "성명", default, deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(rename = "라인", default, deserialize_with = "lenient::string")]
    pub line: String,
}

impl Employee {
    pub fn new(employee_no: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            employee_no: employee_no.into(),
            name: name.into(),
            line: String::new(),
        }
    }
}

impl Record for Employee {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "사번" => Some(self.employee_no.as_str()),
            "성명" => Some(self.name.as_str()),
            "라인" => Some(self.line.as_str()),
            _ => None,
        }
    }
}

/// 出勤記錄
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "사번", default, deserialize_with = "lenient::string")]
    pub employee_no: String,

    #[serde(rename = "근무일자", default, deserialize_with = "lenient::date")]
    pub work_date: Option<NaiveDate>,

    #[serde(rename = "근무시간", default, deserialize_with = "lenient::decimal")]
    pub hours: Decimal,
}

impl AttendanceRecord {
    pub fn new(employee_no: impl Into<String>, work_date: NaiveDate, hours: Decimal) -> Self {
        Self {
            employee_no: employee_no.into(),
            work_date: Some(work_date),
            hours,
        }
    }
}

impl Record for AttendanceRecord {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "사번" => Some(self.employee_no.as_str()),
            _ => None,
        }
    }
}

/// ERP 快照：所有工作表的型別化集合
///
/// 載入一次後即視為不可變，透過參數注入各計算元件。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStore {
    #[serde(rename = "거래처마스터", default)]
    pub partners: Vec<Partner>,

    #[serde(rename = "품목마스터", default)]
    pub items: Vec<Item>,

    #[serde(rename = "BOM", default)]
    pub bom: Vec<BomLine>,

    #[serde(rename = "수주", default)]
    pub sales_orders: Vec<SalesOrder>,

    #[serde(rename = "구매발주", default)]
    pub purchase_orders: Vec<PurchaseOrder>,

    #[serde(rename = "자재입고", default)]
    pub inbound_receipts: Vec<InboundReceipt>,

    #[serde(rename = "작업지시", default)]
    pub work_orders: Vec<WorkOrder>,

    #[serde(rename = "출하", default)]
    pub shipments: Vec<Shipment>,

    #[serde(rename = "재고", default)]
    pub inventory: Vec<InventoryRecord>,

    #[serde(rename = "회계(AR_AP)", default)]
    pub accounting: Vec<AccountingEntry>,

    #[serde(rename = "인사급여", default)]
    pub employees: Vec<Employee>,

    #[serde(rename = "근태관리", default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl RecordStore {
    /// 創建空的記錄存放區
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 快照載入
    ///
    /// 接受 `{ "sheets": { ... } }` 包裝格式，或直接以工作表為頂層鍵的物件。
    /// 未知的工作表會被忽略，個別 `null` 工作表視為空表。
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        let mut value: Value = serde_json::from_str(raw)?;

        if let Some(sheets) = value.get_mut("sheets") {
            value = sheets.take();
        }

        if let Value::Object(map) = &mut value {
            map.retain(|_, sheet| !sheet.is_null());
        }

        Ok(serde_json::from_value(value)?)
    }

    /// 取得指定工作表某欄位的所有值（依記錄順序）
    ///
    /// 記錄型別沒有此欄位時，每列回傳 `None`。
    pub fn column(&self, table: Table, field: &str) -> Vec<Option<&str>> {
        match table {
            Table::Partners => column(&self.partners, field),
            Table::Items => column(&self.items, field),
            Table::Bom => column(&self.bom, field),
            Table::SalesOrders => column(&self.sales_orders, field),
            Table::PurchaseOrders => column(&self.purchase_orders, field),
            Table::InboundReceipts => column(&self.inbound_receipts, field),
            Table::WorkOrders => column(&self.work_orders, field),
            Table::Shipments => column(&self.shipments, field),
            Table::Inventory => column(&self.inventory, field),
            Table::Accounting => column(&self.accounting, field),
            Table::Employees => column(&self.employees, field),
            Table::Attendance => column(&self.attendance, field),
        }
    }

    /// 工作表筆數
    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::Partners => self.partners.len(),
            Table::Items => self.items.len(),
            Table::Bom => self.bom.len(),
            Table::SalesOrders => self.sales_orders.len(),
            Table::PurchaseOrders => self.purchase_orders.len(),
            Table::InboundReceipts => self.inbound_receipts.len(),
            Table::WorkOrders => self.work_orders.len(),
            Table::Shipments => self.shipments.len(),
            Table::Inventory => self.inventory.len(),
            Table::Accounting => self.accounting.len(),
            Table::Employees => self.employees.len(),
            Table::Attendance => self.attendance.len(),
        }
    }

    /// 供應商主檔
    pub fn suppliers(&self) -> impl Iterator<Item = &Partner> {
        self.partners
            .iter()
            .filter(|p| p.kind == PartnerKind::Supplier)
    }

    /// 原材料 / 副材料品目
    pub fn materials(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.category.is_material())
    }

    /// 完成品品目
    pub fn finished_goods(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|i| i.category == ItemCategory::FinishedGood)
    }
}

fn column<'a, R: Record>(rows: &'a [R], field: &str) -> Vec<Option<&'a str>> {
    rows.iter().map(|row| row.field(field)).collect()
}
