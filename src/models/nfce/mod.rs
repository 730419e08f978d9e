//! NFC-e Row Module
//!
//! Insertable rows for the NFC-e tables and their construction from a parsed
//! [`Document`](crate::document::Document).

use crate::{
	document::{Document, Issuer, LineItem, Payment, TaxDetail},
	schema::{emitente, impostos_detalhados, nfce, pagamento, produto},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Insertable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = nfce)]
pub struct NewNfce {
	pub chave_acesso: String,
	pub numero_nota: i32,
	pub serie: i32,
	pub data_emissao: DateTime<Utc>,
	pub total: Decimal,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = emitente)]
pub struct NewEmitente {
	pub cnpj: String,
	pub nome: String,
	pub endereco: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = produto)]
pub struct NewProduto {
	pub id_nfce: i32,
	pub codigo: String,
	pub descricao: String,
	pub quantidade: Decimal,
	pub valor_unitario: Decimal,
	pub valor_total: Decimal,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = impostos_detalhados)]
pub struct NewImpostoDetalhado {
	pub id_produto: i32,
	pub tipo: String,
	pub cst: String,
	pub base_calculo: Option<Decimal>,
	pub aliquota: Option<Decimal>,
	pub valor: Decimal,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = pagamento)]
pub struct NewPagamento {
	pub id_nfce: i32,
	pub forma_pagamento: String,
	pub valor_pago: Decimal,
}

impl NewNfce {
	pub fn from_document(document: &Document) -> Self {
		NewNfce {
			chave_acesso: document.access_key.as_str().to_string(),
			numero_nota: document.number,
			serie: document.series,
			data_emissao: document.issue_date.with_timezone(&Utc),
			total: document.total_value,
		}
	}
}

impl From<&Issuer> for NewEmitente {
	fn from(issuer: &Issuer) -> Self {
		NewEmitente {
			cnpj: issuer.tax_id.clone(),
			nome: issuer.name.clone(),
			endereco: issuer.address.clone(),
		}
	}
}

impl NewProduto {
	pub fn for_item(id_nfce: i32, item: &LineItem) -> Self {
		NewProduto {
			id_nfce,
			codigo: item.code.clone(),
			descricao: item.description.clone(),
			quantidade: item.quantity,
			valor_unitario: item.unit_value,
			valor_total: item.total_value,
		}
	}
}

impl NewImpostoDetalhado {
	pub fn for_tax(id_produto: i32, tax: &TaxDetail) -> Self {
		NewImpostoDetalhado {
			id_produto,
			tipo: tax.kind.as_str().to_string(),
			cst: tax.situation_code.clone(),
			base_calculo: tax.tax_base,
			aliquota: tax.rate,
			valor: tax.amount,
		}
	}
}

impl NewPagamento {
	pub fn for_payment(id_nfce: i32, payment: &Payment) -> Self {
		NewPagamento {
			id_nfce,
			forma_pagamento: payment.method.clone(),
			valor_pago: payment.amount,
		}
	}
}

pub mod operations;
pub mod validators;
